use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::terms::LoanTerms;
use crate::types::EntryStatus;

/// one scheduled installment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub period_number: u32,
    pub due_date: NaiveDate,
    pub payment_amount: Money,
    pub principal_amount: Money,
    pub interest_amount: Money,
    pub remaining_balance: Money,
    pub status: EntryStatus,
}

/// full level-payment amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    /// fixed installment amount (the final installment may differ by the
    /// rounding residue it absorbs)
    pub payment_amount: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub entries: Vec<ScheduleEntry>,
}

impl PaymentSchedule {
    /// generate the schedule for the given terms.
    ///
    /// Pure function of the terms: no clock reads, no identifier
    /// generation, identical output on every call. Fails without emitting
    /// any entries when the terms are invalid.
    pub fn generate(terms: &LoanTerms) -> Result<Self> {
        terms.validate()?;

        let total_periods = terms.total_periods()?;
        let periodic_rate = terms.periodic_rate().as_decimal();
        let payment_amount = level_payment(terms.principal, periodic_rate, total_periods);

        let mut entries = Vec::with_capacity(total_periods as usize);
        let mut balance = terms.principal;
        let mut total_interest = Money::ZERO;
        let mut total_payment = Money::ZERO;
        let mut due_date = terms.payment_frequency.next_due_date(terms.start_date)?;

        for period in 1..=total_periods {
            let interest = Money::from_decimal(balance.as_decimal() * periodic_rate);

            // the final installment retires the balance exactly instead of
            // leaving rounding residue behind
            let (payment, principal_portion) = if period == total_periods {
                (interest + balance, balance)
            } else {
                (payment_amount, (payment_amount - interest).min(balance))
            };

            balance = (balance - principal_portion).max(Money::ZERO);
            total_interest += interest;
            total_payment += payment;

            entries.push(ScheduleEntry {
                period_number: period,
                due_date,
                payment_amount: payment,
                principal_amount: principal_portion,
                interest_amount: interest,
                remaining_balance: balance,
                status: EntryStatus::Pending,
            });

            if period < total_periods {
                due_date = terms.payment_frequency.next_due_date(due_date)?;
            }
        }

        Ok(Self {
            payment_amount,
            total_interest,
            total_payment,
            entries,
        })
    }

    /// get the entry for a 1-based period number
    pub fn entry(&self, period_number: u32) -> Option<&ScheduleEntry> {
        self.entries.get(period_number.checked_sub(1)? as usize)
    }

    /// due date of the final installment
    pub fn final_due_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.due_date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// fixed installment for level-payment amortization:
/// P * r * (1 + r)^n / ((1 + r)^n - 1), or P / n at zero rate
fn level_payment(principal: Money, periodic_rate: Decimal, periods: u32) -> Money {
    if periodic_rate.is_zero() {
        return principal / Decimal::from(periods);
    }

    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + periodic_rate;
    for _ in 0..periods {
        compound *= base;
    }

    let numerator = principal.as_decimal() * periodic_rate * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
}
