use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::{EventStore, LoanEvent};
use crate::loan::LoanRecord;
use crate::types::{EntryStatus, LoanStatus};

/// how a received payment was applied across the schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub amount: Money,
    pub applied_to_interest: Money,
    pub applied_to_principal: Money,
    /// period numbers settled by this payment, in order
    pub entries_settled: Vec<u32>,
    /// remainder too small to settle the next entry, returned to the caller
    pub excess: Money,
}

impl PaymentReceipt {
    pub fn total_applied(&self) -> Money {
        self.applied_to_interest + self.applied_to_principal
    }
}

impl LoanRecord {
    /// apply a payment against the schedule, settling whole entries
    /// oldest first.
    ///
    /// An entry is settled only when the remaining amount covers its full
    /// installment; anything smaller comes back as excess rather than
    /// splitting an entry. Settling the final entry completes the loan.
    pub fn apply_payment(
        &mut self,
        amount: Money,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<PaymentReceipt> {
        if !matches!(self.status, LoanStatus::Active | LoanStatus::Overdue) {
            return Err(LoanError::LoanNotActive {
                status: self.status,
            });
        }

        if !amount.is_positive() {
            return Err(LoanError::InvalidPaymentAmount { amount });
        }

        let mut remaining = amount;
        let mut applied_to_interest = Money::ZERO;
        let mut applied_to_principal = Money::ZERO;
        let mut entries_settled = Vec::new();

        for entry in self.schedule.entries.iter_mut() {
            if entry.status == EntryStatus::Paid {
                continue;
            }
            if remaining < entry.payment_amount {
                break;
            }
            remaining -= entry.payment_amount;
            applied_to_interest += entry.interest_amount;
            applied_to_principal += entry.principal_amount;
            entry.status = EntryStatus::Paid;
            entries_settled.push(entry.period_number);
        }

        self.remaining_balance = (self.remaining_balance - applied_to_principal).max(Money::ZERO);

        let now = time.now();
        events.emit(LoanEvent::PaymentReceived {
            loan_id: self.id,
            amount,
            applied_to_interest,
            applied_to_principal,
            excess: remaining,
            timestamp: now,
        });

        let all_paid = self
            .schedule
            .entries
            .iter()
            .all(|e| e.status == EntryStatus::Paid);
        let any_overdue = self
            .schedule
            .entries
            .iter()
            .any(|e| e.status == EntryStatus::Overdue);

        if all_paid {
            self.set_status(LoanStatus::Completed, now, events);
            events.emit(LoanEvent::LoanSettled {
                loan_id: self.id,
                timestamp: now,
            });
        } else if self.status == LoanStatus::Overdue && !any_overdue {
            self.set_status(LoanStatus::Active, now, events);
        }

        Ok(PaymentReceipt {
            amount,
            applied_to_interest,
            applied_to_principal,
            entries_settled,
            excess: remaining,
        })
    }

    /// flip pending entries past their due date to overdue, as observed
    /// at the provider's current date. No-op on settled or written-off
    /// loans. Returns how many entries flipped.
    pub fn mark_overdue(
        &mut self,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<u32> {
        if !matches!(self.status, LoanStatus::Active | LoanStatus::Overdue) {
            return Ok(0);
        }

        let as_of: NaiveDate = time.now().date_naive();
        let mut flipped = 0;

        for entry in self.schedule.entries.iter_mut() {
            if entry.status == EntryStatus::Pending && entry.due_date < as_of {
                entry.status = EntryStatus::Overdue;
                flipped += 1;
                events.emit(LoanEvent::EntryOverdue {
                    loan_id: self.id,
                    period_number: entry.period_number,
                    due_date: entry.due_date,
                });
            }
        }

        if flipped > 0 {
            self.set_status(LoanStatus::Overdue, time.now(), events);
        }

        Ok(flipped)
    }
}
