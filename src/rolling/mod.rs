//! Rolling-window flight-time aggregation.
//!
//! Regulatory ceilings apply to flight time summed over trailing 28-day and
//! 365-day windows. Both windows are inclusive of the as-of date and of the
//! date exactly 28 (or 365) days before it, keyed on the record's duty date.

mod dates;

pub use dates::{consecutive_duty_days, minutes_to_hours, whole_years_between};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::DutyTimeRecord;
use crate::store::{CrewDataStore, StoreResult};

/// Length of the short rolling window in days.
pub const WINDOW_28_DAYS: i64 = 28;

/// Length of the long rolling window in days.
pub const WINDOW_365_DAYS: i64 = 365;

/// Flight hours in both rolling windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingHours {
    /// Flight hours with duty date in `[as_of - 28d, as_of]`.
    pub hours_28_days: Decimal,
    /// Flight hours with duty date in `[as_of - 365d, as_of]`.
    pub hours_365_days: Decimal,
}

impl RollingHours {
    /// Both windows with `extra` hours added.
    pub fn projected(&self, extra: Decimal) -> Self {
        Self {
            hours_28_days: self.hours_28_days + extra,
            hours_365_days: self.hours_365_days + extra,
        }
    }
}

/// First date of the 365-day window ending at `as_of`.
pub fn history_start(as_of: NaiveDate) -> NaiveDate {
    as_of - Duration::days(WINDOW_365_DAYS)
}

/// Sums flight time of `records` into both windows ending at `as_of`.
///
/// Records outside the 365-day window are ignored, so callers may pass a
/// wider history than needed.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::rolling::rolling_hours_from_records;
/// use chrono::NaiveDate;
///
/// let as_of = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
/// let hours = rolling_hours_from_records(&[], as_of);
/// assert!(hours.hours_28_days.is_zero());
/// assert!(hours.hours_365_days.is_zero());
/// ```
pub fn rolling_hours_from_records(records: &[DutyTimeRecord], as_of: NaiveDate) -> RollingHours {
    let start_28 = as_of - Duration::days(WINDOW_28_DAYS);
    let start_365 = history_start(as_of);

    let mut minutes_28: i64 = 0;
    let mut minutes_365: i64 = 0;
    for record in records {
        if record.duty_date > as_of || record.duty_date < start_365 {
            continue;
        }
        minutes_365 += record.flight_minutes;
        if record.duty_date >= start_28 {
            minutes_28 += record.flight_minutes;
        }
    }

    RollingHours {
        hours_28_days: minutes_to_hours(minutes_28),
        hours_365_days: minutes_to_hours(minutes_365),
    }
}

/// Reads a crew member's history and sums both windows ending at `as_of`.
pub async fn rolling_hours<S: CrewDataStore>(
    store: &S,
    crew_id: &str,
    as_of: NaiveDate,
) -> StoreResult<RollingHours> {
    let records = store
        .get_duty_time_records(crew_id, history_start(as_of), as_of)
        .await?;
    let hours = rolling_hours_from_records(&records, as_of);

    debug!(
        crew_id = %crew_id,
        as_of = %as_of,
        records = records.len(),
        hours_28_days = %hours.hours_28_days,
        hours_365_days = %hours.hours_365_days,
        "Computed rolling flight hours"
    );

    Ok(hours)
}
