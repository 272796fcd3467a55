use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::frequency::PaymentFrequency;

/// financial terms a loan is originated with.
///
/// Immutable input to the schedule generator; validation rejects any
/// combination the amortization formula cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub interest_rate: Rate,
    pub term_months: u32,
    pub payment_frequency: PaymentFrequency,
    pub start_date: NaiveDate,
}

impl LoanTerms {
    pub fn new(
        principal: Money,
        interest_rate: Rate,
        term_months: u32,
        payment_frequency: PaymentFrequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            principal,
            interest_rate,
            term_months,
            payment_frequency,
            start_date,
        }
    }

    /// validate the terms without generating a schedule
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(LoanError::InvalidPrincipal {
                amount: self.principal,
            });
        }

        if self.term_months == 0 {
            return Err(LoanError::InvalidTerm {
                months: self.term_months,
            });
        }

        if self.interest_rate.is_negative() {
            return Err(LoanError::InvalidInterestRate {
                rate: self.interest_rate,
            });
        }

        self.total_periods()?;

        Ok(())
    }

    /// number of payment periods over the whole term.
    ///
    /// The term must divide into whole periods: term_months / 12 *
    /// periods_per_year, rejected rather than truncated when fractional.
    pub fn total_periods(&self) -> Result<u32> {
        let scaled = u64::from(self.term_months) * u64::from(self.payment_frequency.periods_per_year());
        if scaled % 12 != 0 {
            return Err(LoanError::TermFrequencyMismatch {
                term_months: self.term_months,
                frequency: self.payment_frequency,
            });
        }
        Ok((scaled / 12) as u32)
    }

    /// interest rate for a single payment period
    pub fn periodic_rate(&self) -> Rate {
        self.interest_rate
            .periodic(self.payment_frequency.periods_per_year())
    }
}
