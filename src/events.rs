use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{LoanId, LoanStatus};

/// all events emitted by loan operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanEvent {
    // lifecycle events
    LoanOriginated {
        loan_id: LoanId,
        loan_number: String,
        principal: Money,
        timestamp: DateTime<Utc>,
    },
    ScheduleGenerated {
        loan_id: LoanId,
        periods: u32,
        payment_amount: Money,
        final_due_date: NaiveDate,
    },
    LoanSettled {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentReceived {
        loan_id: LoanId,
        amount: Money,
        applied_to_interest: Money,
        applied_to_principal: Money,
        excess: Money,
        timestamp: DateTime<Utc>,
    },
    EntryOverdue {
        loan_id: LoanId,
        period_number: u32,
        due_date: NaiveDate,
    },

    // status change events
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<LoanEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: LoanEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LoanEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LoanEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
