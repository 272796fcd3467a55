pub mod decimal;
pub mod errors;
pub mod events;
pub mod frequency;
pub mod loan;
pub mod numbering;
pub mod payments;
pub mod schedule;
pub mod terms;
pub mod types;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use events::{EventStore, LoanEvent};
pub use frequency::PaymentFrequency;
pub use loan::{LoanBuilder, LoanRecord, LoanView};
pub use numbering::LoanNumber;
pub use payments::PaymentReceipt;
pub use schedule::{PaymentSchedule, ScheduleEntry};
pub use terms::LoanTerms;
pub use types::{Borrower, BorrowerType, EntryStatus, LoanId, LoanStatus};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
