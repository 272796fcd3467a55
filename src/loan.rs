use chrono::{DateTime, Datelike, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::events::{EventStore, LoanEvent};
use crate::frequency::PaymentFrequency;
use crate::numbering::LoanNumber;
use crate::schedule::{PaymentSchedule, ScheduleEntry};
use crate::terms::LoanTerms;
use crate::types::{Borrower, BorrowerType, EntryStatus, LoanId, LoanStatus};

/// a loan as held in the loan book.
///
/// Built exactly once at origination; after that only the payment and
/// overdue operations mutate it. The schedule's amounts are never
/// recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: LoanId,
    pub loan_number: LoanNumber,
    pub borrower: Borrower,
    pub terms: LoanTerms,
    pub purpose: Option<String>,
    pub collateral: Option<String>,
    pub notes: Option<String>,
    pub end_date: NaiveDate,
    pub remaining_balance: Money,
    pub status: LoanStatus,
    pub originated_at: DateTime<Utc>,
    pub schedule: PaymentSchedule,
}

impl LoanRecord {
    /// builder for originating loans
    pub fn builder() -> LoanBuilder {
        LoanBuilder::new()
    }

    /// earliest entry still awaiting payment
    pub fn next_unpaid_entry(&self) -> Option<&ScheduleEntry> {
        self.schedule
            .entries
            .iter()
            .find(|e| e.status != EntryStatus::Paid)
    }

    /// count of settled entries
    pub fn entries_paid(&self) -> u32 {
        self.schedule
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Paid)
            .count() as u32
    }

    pub fn is_settled(&self) -> bool {
        self.status == LoanStatus::Completed
    }

    /// write off the loan
    pub fn mark_defaulted(
        &mut self,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<()> {
        if !matches!(self.status, LoanStatus::Active | LoanStatus::Overdue) {
            return Err(LoanError::LoanNotActive {
                status: self.status,
            });
        }
        self.set_status(LoanStatus::Defaulted, time.now(), events);
        Ok(())
    }

    pub(crate) fn set_status(
        &mut self,
        new_status: LoanStatus,
        timestamp: DateTime<Utc>,
        events: &mut EventStore,
    ) {
        if self.status == new_status {
            return;
        }
        events.emit(LoanEvent::StatusChanged {
            loan_id: self.id,
            old_status: self.status,
            new_status,
            timestamp,
        });
        self.status = new_status;
    }

    /// summary view for the API layer
    pub fn view(&self) -> LoanView {
        LoanView::from_record(self)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| LoanError::Serialization {
            message: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LoanError::Serialization {
            message: e.to_string(),
        })
    }
}

/// serializable summary of a loan record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub loan_number: String,
    pub borrower: Borrower,
    pub status: LoanStatus,
    pub principal: Money,
    pub interest_rate: Rate,
    pub term_months: u32,
    pub payment_frequency: PaymentFrequency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub originated_at: DateTime<Utc>,
    pub remaining_balance: Money,
    pub payment_amount: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub periods: u32,
    pub entries_paid: u32,
    pub next_payment_due: Option<NaiveDate>,
    pub next_payment_amount: Option<Money>,
}

impl LoanView {
    pub fn from_record(record: &LoanRecord) -> Self {
        let next = record.next_unpaid_entry();
        LoanView {
            id: record.id,
            loan_number: record.loan_number.to_string(),
            borrower: record.borrower.clone(),
            status: record.status,
            principal: record.terms.principal,
            interest_rate: record.terms.interest_rate,
            term_months: record.terms.term_months,
            payment_frequency: record.terms.payment_frequency,
            start_date: record.terms.start_date,
            end_date: record.end_date,
            originated_at: record.originated_at,
            remaining_balance: record.remaining_balance,
            payment_amount: record.schedule.payment_amount,
            total_interest: record.schedule.total_interest,
            total_payment: record.schedule.total_payment,
            periods: record.schedule.len() as u32,
            entries_paid: record.entries_paid(),
            next_payment_due: next.map(|e| e.due_date),
            next_payment_amount: next.map(|e| e.payment_amount),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LoanError::Serialization {
            message: e.to_string(),
        })
    }
}

/// builder for originating loans
#[derive(Debug, Default)]
pub struct LoanBuilder {
    principal: Option<Money>,
    interest_rate: Option<Rate>,
    term_months: Option<u32>,
    payment_frequency: Option<PaymentFrequency>,
    start_date: Option<NaiveDate>,
    borrower: Option<Borrower>,
    purpose: Option<String>,
    collateral: Option<String>,
    notes: Option<String>,
    status: Option<LoanStatus>,
    loan_number: Option<LoanNumber>,
    sequence: Option<u32>,
}

impl LoanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, amount: Money) -> Self {
        self.principal = Some(amount);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.interest_rate = Some(rate);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn frequency(mut self, frequency: PaymentFrequency) -> Self {
        self.payment_frequency = Some(frequency);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn borrower(mut self, borrower_type: BorrowerType, borrower_id: impl Into<String>) -> Self {
        self.borrower = Some(Borrower::new(borrower_type, borrower_id));
        self
    }

    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    pub fn collateral(mut self, collateral: impl Into<String>) -> Self {
        self.collateral = Some(collateral.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// initial status override (defaults to active)
    pub fn status(mut self, status: LoanStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// use an already-allocated loan number
    pub fn loan_number(mut self, number: LoanNumber) -> Self {
        self.loan_number = Some(number);
        self
    }

    /// allocate the number from this per-year sequence (count of loans
    /// already created this year + 1, supplied by the persistence layer)
    pub fn sequence(mut self, sequence: u32) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// validate the terms, generate the schedule, and assemble the record
    pub fn originate(
        self,
        time: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<LoanRecord> {
        let principal = self.principal.ok_or(LoanError::InvalidConfiguration {
            message: "principal required".to_string(),
        })?;

        let interest_rate = self.interest_rate.ok_or(LoanError::InvalidConfiguration {
            message: "interest rate required".to_string(),
        })?;

        let term_months = self.term_months.ok_or(LoanError::InvalidConfiguration {
            message: "term required".to_string(),
        })?;

        let borrower = self.borrower.ok_or(LoanError::InvalidConfiguration {
            message: "borrower required".to_string(),
        })?;

        let now = time.now();
        let start_date = self.start_date.unwrap_or_else(|| now.date_naive());
        let frequency = self.payment_frequency.unwrap_or(PaymentFrequency::Monthly);

        let loan_number = match (self.loan_number, self.sequence) {
            (Some(number), _) => number,
            (None, Some(sequence)) => LoanNumber::assign(now.year(), sequence)?,
            (None, None) => {
                return Err(LoanError::InvalidConfiguration {
                    message: "loan number or numbering sequence required".to_string(),
                });
            }
        };

        let terms = LoanTerms::new(principal, interest_rate, term_months, frequency, start_date);
        let schedule = PaymentSchedule::generate(&terms)?;
        let end_date = schedule
            .final_due_date()
            .ok_or(LoanError::InvalidConfiguration {
                message: "schedule produced no entries".to_string(),
            })?;

        let id = Uuid::new_v4();

        events.emit(LoanEvent::LoanOriginated {
            loan_id: id,
            loan_number: loan_number.to_string(),
            principal,
            timestamp: now,
        });
        events.emit(LoanEvent::ScheduleGenerated {
            loan_id: id,
            periods: schedule.len() as u32,
            payment_amount: schedule.payment_amount,
            final_due_date: end_date,
        });

        Ok(LoanRecord {
            id,
            loan_number,
            borrower,
            terms,
            purpose: self.purpose,
            collateral: self.collateral,
            notes: self.notes,
            end_date,
            remaining_balance: principal,
            status: self.status.unwrap_or(LoanStatus::Active),
            originated_at: now,
            schedule,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn originate_standard(events: &mut EventStore) -> LoanRecord {
        let time = test_time();
        LoanRecord::builder()
            .principal(Money::from_major(100_000))
            .rate(Rate::from_percentage(dec!(12)))
            .term_months(12)
            .frequency(PaymentFrequency::Monthly)
            .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .borrower(BorrowerType::Employee, "EMP-042")
            .purpose("tractor purchase")
            .sequence(1)
            .originate(&time, events)
            .unwrap()
    }

    #[test]
    fn test_originate_assembles_record() {
        let mut events = EventStore::new();
        let loan = originate_standard(&mut events);

        assert_eq!(loan.loan_number.to_string(), "LN240001");
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(loan.remaining_balance, Money::from_major(100_000));
        assert_eq!(loan.schedule.len(), 12);
        assert_eq!(loan.end_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(loan.borrower.borrower_type, BorrowerType::Employee);
        assert_eq!(loan.purpose.as_deref(), Some("tractor purchase"));
    }

    #[test]
    fn test_originate_emits_events() {
        let mut events = EventStore::new();
        let loan = originate_standard(&mut events);

        let emitted = events.take_events();
        assert_eq!(emitted.len(), 2);
        assert!(matches!(
            &emitted[0],
            LoanEvent::LoanOriginated { loan_id, loan_number, .. }
                if *loan_id == loan.id && loan_number == "LN240001"
        ));
        assert!(matches!(
            &emitted[1],
            LoanEvent::ScheduleGenerated { periods: 12, .. }
        ));
    }

    #[test]
    fn test_explicit_loan_number_wins() {
        let time = test_time();
        let mut events = EventStore::new();
        let number = LoanNumber::assign(2023, 99).unwrap();

        let loan = LoanRecord::builder()
            .principal(Money::from_major(5_000))
            .rate(Rate::from_percentage(dec!(8)))
            .term_months(12)
            .borrower(BorrowerType::Contractor, "CTR-007")
            .loan_number(number)
            .originate(&time, &mut events)
            .unwrap();

        assert_eq!(loan.loan_number, number);
    }

    #[test]
    fn test_builder_requires_fields() {
        let time = test_time();
        let mut events = EventStore::new();

        let err = LoanRecord::builder()
            .rate(Rate::from_percentage(dec!(8)))
            .term_months(12)
            .borrower(BorrowerType::Other, "X")
            .sequence(1)
            .originate(&time, &mut events)
            .unwrap_err();
        assert!(matches!(err, LoanError::InvalidConfiguration { .. }));

        let err = LoanRecord::builder()
            .principal(Money::from_major(5_000))
            .rate(Rate::from_percentage(dec!(8)))
            .term_months(12)
            .sequence(1)
            .originate(&time, &mut events)
            .unwrap_err();
        assert!(matches!(err, LoanError::InvalidConfiguration { .. }));

        // no loan number and no sequence
        let err = LoanRecord::builder()
            .principal(Money::from_major(5_000))
            .rate(Rate::from_percentage(dec!(8)))
            .term_months(12)
            .borrower(BorrowerType::Other, "X")
            .originate(&time, &mut events)
            .unwrap_err();
        assert!(matches!(err, LoanError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_originate_rejects_bad_terms() {
        let time = test_time();
        let mut events = EventStore::new();

        let err = LoanRecord::builder()
            .principal(Money::from_major(-100))
            .rate(Rate::from_percentage(dec!(8)))
            .term_months(12)
            .borrower(BorrowerType::Employee, "EMP-1")
            .sequence(1)
            .originate(&time, &mut events)
            .unwrap_err();
        assert!(matches!(err, LoanError::InvalidPrincipal { .. }));
    }

    #[test]
    fn test_start_date_defaults_to_origination_day() {
        let time = test_time();
        let mut events = EventStore::new();

        let loan = LoanRecord::builder()
            .principal(Money::from_major(5_000))
            .rate(Rate::from_percentage(dec!(8)))
            .term_months(12)
            .borrower(BorrowerType::Employee, "EMP-1")
            .sequence(3)
            .originate(&time, &mut events)
            .unwrap();

        assert_eq!(loan.terms.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(
            loan.schedule.entry(1).unwrap().due_date,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_mark_defaulted() {
        let time = test_time();
        let mut events = EventStore::new();
        let mut loan = originate_standard(&mut events);
        events.clear();

        loan.mark_defaulted(&time, &mut events).unwrap();
        assert_eq!(loan.status, LoanStatus::Defaulted);
        assert!(matches!(
            events.events()[0],
            LoanEvent::StatusChanged {
                old_status: LoanStatus::Active,
                new_status: LoanStatus::Defaulted,
                ..
            }
        ));

        // cannot default twice
        assert!(loan.mark_defaulted(&time, &mut events).is_err());
    }

    #[test]
    fn test_record_json_round_trip() {
        let mut events = EventStore::new();
        let loan = originate_standard(&mut events);

        let json = loan.to_json().unwrap();
        let back = LoanRecord::from_json(&json).unwrap();
        assert_eq!(back, loan);
    }

    #[test]
    fn test_view_summarizes_record() {
        let mut events = EventStore::new();
        let loan = originate_standard(&mut events);
        let view = loan.view();

        assert_eq!(view.loan_number, "LN240001");
        assert_eq!(view.periods, 12);
        assert_eq!(view.entries_paid, 0);
        assert_eq!(
            view.next_payment_due,
            Some(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
        assert_eq!(view.next_payment_amount, Some(loan.schedule.payment_amount));
        assert!(view.to_json_pretty().unwrap().contains("LN240001"));
    }
}
