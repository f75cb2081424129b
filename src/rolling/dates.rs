//! Date and duration helpers shared by the validator, monitor and pay
//! calculator.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// Converts whole minutes to decimal hours.
///
/// Sum minutes before converting; the division is exact only for multiples
/// of three minutes.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::rolling::minutes_to_hours;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(minutes_to_hours(510), Decimal::from_str("8.5").unwrap());
/// assert_eq!(minutes_to_hours(0), Decimal::ZERO);
/// ```
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}

/// Whole years elapsed from `from` to `to`; zero when `to` precedes `from`.
///
/// A year counts once the anniversary date is reached.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::rolling::whole_years_between;
/// use chrono::NaiveDate;
///
/// let hire = NaiveDate::from_ymd_opt(2015, 6, 15).unwrap();
/// assert_eq!(whole_years_between(hire, NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()), 9);
/// assert_eq!(whole_years_between(hire, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()), 10);
/// assert_eq!(whole_years_between(hire, NaiveDate::from_ymd_opt(2014, 1, 1).unwrap()), 0);
/// ```
pub fn whole_years_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Counts consecutive duty days ending the day before `proposed_date`.
///
/// Only dates strictly before `proposed_date` count. Walking backwards, the
/// run stops at the first gap of more than one day, so a duty two days
/// before the proposed date yields zero.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::rolling::consecutive_duty_days;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
/// assert_eq!(consecutive_duty_days([d(7), d(8), d(9)], d(10)), 3);
/// assert_eq!(consecutive_duty_days([d(5), d(8), d(9)], d(10)), 2);
/// assert_eq!(consecutive_duty_days([d(8)], d(10)), 0);
/// ```
pub fn consecutive_duty_days(
    duty_dates: impl IntoIterator<Item = NaiveDate>,
    proposed_date: NaiveDate,
) -> u32 {
    let prior: BTreeSet<NaiveDate> = duty_dates
        .into_iter()
        .filter(|d| *d < proposed_date)
        .collect();

    let mut count = 0;
    let mut expected = proposed_date;
    for date in prior.iter().rev() {
        if (expected - *date).num_days() > 1 {
            break;
        }
        count += 1;
        expected = *date;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_minutes_to_hours() {
        assert_eq!(minutes_to_hours(3930), dec("65.5"));
        assert_eq!(minutes_to_hours(5700), dec("95"));
        assert_eq!(minutes_to_hours(45), dec("0.75"));
    }

    #[test]
    fn test_whole_years_leap_day_hire() {
        let hire = date(2016, 2, 29);
        assert_eq!(whole_years_between(hire, date(2017, 2, 28)), 0);
        assert_eq!(whole_years_between(hire, date(2017, 3, 1)), 1);
        assert_eq!(whole_years_between(hire, date(2020, 2, 29)), 4);
    }

    #[test]
    fn test_whole_years_same_day_is_zero() {
        assert_eq!(whole_years_between(date(2025, 1, 1), date(2025, 1, 1)), 0);
    }

    #[test]
    fn test_consecutive_days_ignores_duplicates_and_later_dates() {
        let dates = vec![
            date(2025, 3, 9),
            date(2025, 3, 9),
            date(2025, 3, 8),
            date(2025, 3, 10),
            date(2025, 3, 12),
        ];
        assert_eq!(consecutive_duty_days(dates, date(2025, 3, 10)), 2);
    }

    #[test]
    fn test_consecutive_days_across_month_boundary() {
        let dates = vec![date(2025, 2, 27), date(2025, 2, 28), date(2025, 3, 1)];
        assert_eq!(consecutive_duty_days(dates, date(2025, 3, 2)), 3);
    }

    #[test]
    fn test_consecutive_days_empty_history() {
        assert_eq!(consecutive_duty_days(Vec::new(), date(2025, 3, 2)), 0);
    }
}
