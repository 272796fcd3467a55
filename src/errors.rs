use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::frequency::PaymentFrequency;
use crate::types::LoanStatus;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("invalid principal: {amount}")]
    InvalidPrincipal {
        amount: Money,
    },

    #[error("invalid term: {months} months")]
    InvalidTerm {
        months: u32,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("unsupported payment frequency: {value}")]
    UnsupportedFrequency {
        value: String,
    },

    #[error("term of {term_months} months does not divide into whole {frequency} periods")]
    TermFrequencyMismatch {
        term_months: u32,
        frequency: PaymentFrequency,
    },

    #[error("invalid loan number: {value}")]
    InvalidLoanNumber {
        value: String,
    },

    #[error("invalid numbering sequence: {sequence}")]
    InvalidSequence {
        sequence: u32,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("loan not active: current status is {status:?}")]
    LoanNotActive {
        status: LoanStatus,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("serialization failed: {message}")]
    Serialization {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LoanError>;
