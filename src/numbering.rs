use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{LoanError, Result};

/// human-readable loan identifier: "LN" + two-digit year + zero-padded
/// sequence, e.g. LN250001.
///
/// Pure value: the per-year sequence counter is owned by the persistence
/// layer, which must allocate it inside the same transaction that stores
/// the loan so two concurrent originations never share a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct LoanNumber {
    year: u32,
    sequence: u32,
}

impl LoanNumber {
    pub const PREFIX: &'static str = "LN";

    /// assign a number from a calendar year and a 1-based per-year sequence
    pub fn assign(year: i32, sequence: u32) -> Result<Self> {
        if sequence == 0 {
            return Err(LoanError::InvalidSequence { sequence });
        }
        Ok(Self {
            year: year.rem_euclid(100) as u32,
            sequence,
        })
    }

    /// two-digit year component
    pub fn year_two_digit(&self) -> u32 {
        self.year
    }

    /// per-year sequence component
    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for LoanNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}{:04}", Self::PREFIX, self.year, self.sequence)
    }
}

impl FromStr for LoanNumber {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || LoanError::InvalidLoanNumber {
            value: s.to_string(),
        };

        let digits = s.strip_prefix(Self::PREFIX).ok_or_else(invalid)?;
        // two year digits plus at least the four-wide sequence
        if digits.len() < 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year = digits[..2].parse::<u32>().map_err(|_| invalid())?;
        let sequence = digits[2..].parse::<u32>().map_err(|_| invalid())?;
        if sequence == 0 {
            return Err(invalid());
        }

        Ok(Self { year, sequence })
    }
}

impl From<LoanNumber> for String {
    fn from(n: LoanNumber) -> String {
        n.to_string()
    }
}

impl TryFrom<String> for LoanNumber {
    type Error = LoanError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}
