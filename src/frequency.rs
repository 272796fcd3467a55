use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{LoanError, Result};

/// how often a scheduled payment falls due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Weekly,
    Monthly,
    Quarterly,
    Annually,
}

impl PaymentFrequency {
    /// number of payment periods per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Annually => 1,
        }
    }

    /// advance a due date by one payment period.
    ///
    /// Month and year steps use calendar arithmetic with chrono's
    /// clamp-to-end-of-month rule: Jan 31 + 1 month lands on the last day
    /// of February. The clamped day carries forward on subsequent steps
    /// (Feb 29 + 1 month is Mar 29, not Mar 31).
    pub fn next_due_date(&self, date: NaiveDate) -> Result<NaiveDate> {
        let next = match self {
            PaymentFrequency::Weekly => date.checked_add_days(Days::new(7)),
            PaymentFrequency::Monthly => date.checked_add_months(Months::new(1)),
            PaymentFrequency::Quarterly => date.checked_add_months(Months::new(3)),
            PaymentFrequency::Annually => date.checked_add_months(Months::new(12)),
        };
        next.ok_or_else(|| LoanError::InvalidDate {
            message: format!("due date past calendar range advancing {} from {}", self, date),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::Annually => "annually",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "weekly" => Ok(PaymentFrequency::Weekly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "annually" => Ok(PaymentFrequency::Annually),
            other => Err(LoanError::UnsupportedFrequency {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_periods_per_year() {
        assert_eq!(PaymentFrequency::Weekly.periods_per_year(), 52);
        assert_eq!(PaymentFrequency::Monthly.periods_per_year(), 12);
        assert_eq!(PaymentFrequency::Quarterly.periods_per_year(), 4);
        assert_eq!(PaymentFrequency::Annually.periods_per_year(), 1);
    }

    #[test]
    fn test_weekly_step() {
        let next = PaymentFrequency::Weekly.next_due_date(date(2024, 1, 1)).unwrap();
        assert_eq!(next, date(2024, 1, 8));

        // crosses a month boundary
        let next = PaymentFrequency::Weekly.next_due_date(date(2024, 1, 29)).unwrap();
        assert_eq!(next, date(2024, 2, 5));
    }

    #[test]
    fn test_monthly_step() {
        let next = PaymentFrequency::Monthly.next_due_date(date(2024, 1, 1)).unwrap();
        assert_eq!(next, date(2024, 2, 1));
    }

    #[test]
    fn test_month_end_clamping() {
        // Jan 31 clamps to the last day of February (leap year)
        let next = PaymentFrequency::Monthly.next_due_date(date(2024, 1, 31)).unwrap();
        assert_eq!(next, date(2024, 2, 29));

        // non-leap year
        let next = PaymentFrequency::Monthly.next_due_date(date(2025, 1, 31)).unwrap();
        assert_eq!(next, date(2025, 2, 28));

        // the clamped day carries forward
        let next = PaymentFrequency::Monthly.next_due_date(date(2024, 2, 29)).unwrap();
        assert_eq!(next, date(2024, 3, 29));
    }

    #[test]
    fn test_quarterly_step() {
        let next = PaymentFrequency::Quarterly.next_due_date(date(2024, 11, 30)).unwrap();
        assert_eq!(next, date(2025, 2, 28));
    }

    #[test]
    fn test_annual_step_leap_day() {
        let next = PaymentFrequency::Annually.next_due_date(date(2024, 2, 29)).unwrap();
        assert_eq!(next, date(2025, 2, 28));
    }

    #[test]
    fn test_parse() {
        assert_eq!("monthly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Monthly);
        assert_eq!("weekly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Weekly);

        let err = "biweekly".parse::<PaymentFrequency>().unwrap_err();
        assert!(matches!(err, LoanError::UnsupportedFrequency { value } if value == "biweekly"));
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentFrequency::Quarterly).unwrap(),
            "\"quarterly\""
        );
        let freq: PaymentFrequency = serde_json::from_str("\"annually\"").unwrap();
        assert_eq!(freq, PaymentFrequency::Annually);
    }
}
