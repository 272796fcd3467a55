use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// who the loan was issued to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowerType {
    Employee,
    Contractor,
    Other,
}

/// borrower identity attached to a loan record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    pub borrower_type: BorrowerType,
    pub borrower_id: String,
}

impl Borrower {
    pub fn new(borrower_type: BorrowerType, borrower_id: impl Into<String>) -> Self {
        Self {
            borrower_type,
            borrower_id: borrower_id.into(),
        }
    }
}

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// performing, payments still owed
    Active,
    /// every scheduled payment settled
    Completed,
    /// written off, no further collection expected
    Defaulted,
    /// one or more scheduled payments past due
    Overdue,
}

/// status of a single schedule entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Paid,
    Overdue,
}
