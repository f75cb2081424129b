//! Pay period and public holiday models.
//!
//! This module contains the [`PayPeriod`] and [`PublicHoliday`] types that
//! bound a pay calculation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A public holiday on which holiday premium applies.
///
/// # Example
///
/// ```
/// use crew_rules_engine::models::PublicHoliday;
/// use chrono::NaiveDate;
///
/// let holiday = PublicHoliday {
///     date: NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
///     name: "Independence Day".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
}

/// An inclusive date range a pay calculation covers.
///
/// # Example
///
/// ```
/// use crew_rules_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
/// )
/// .unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
/// assert_eq!(period.days(), 31);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a pay period, rejecting an end before the start.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if end_date < start_date {
            return Err(EngineError::InvalidPeriod {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Checks if a given date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days in the period.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Checks if `date` is one of the given public holidays.
pub fn is_public_holiday(holidays: &[PublicHoliday], date: NaiveDate) -> bool {
    holidays.iter().any(|h| h.date == date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_end_before_start() {
        let result = PayPeriod::new(date(2025, 3, 31), date(2025, 3, 1));
        match result {
            Err(EngineError::InvalidPeriod { start, end }) => {
                assert_eq!(start, date(2025, 3, 31));
                assert_eq!(end, date(2025, 3, 1));
            }
            other => panic!("Expected InvalidPeriod, got {:?}", other),
        }
    }

    #[test]
    fn test_single_day_period() {
        let period = PayPeriod::new(date(2025, 3, 5), date(2025, 3, 5)).unwrap();
        assert_eq!(period.days(), 1);
        assert!(period.contains_date(date(2025, 3, 5)));
        assert!(!period.contains_date(date(2025, 3, 4)));
    }

    #[test]
    fn test_is_public_holiday() {
        let holidays = vec![
            PublicHoliday {
                date: date(2025, 12, 25),
                name: "Christmas Day".to_string(),
            },
            PublicHoliday {
                date: date(2026, 1, 1),
                name: "New Year's Day".to_string(),
            },
        ];

        assert!(is_public_holiday(&holidays, date(2025, 12, 25)));
        assert!(is_public_holiday(&holidays, date(2026, 1, 1)));
        assert!(!is_public_holiday(&holidays, date(2025, 12, 24)));
        assert!(!is_public_holiday(&[], date(2025, 12, 25)));
    }

    #[test]
    fn test_deserialize_public_holiday() {
        let json = r#"{"date": "2025-11-27", "name": "Thanksgiving Day"}"#;
        let holiday: PublicHoliday = serde_json::from_str(json).unwrap();
        assert_eq!(holiday.date, date(2025, 11, 27));
        assert_eq!(holiday.name, "Thanksgiving Day");
    }
}
