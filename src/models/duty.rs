//! Duty period models.
//!
//! This module defines [`DutyTimeRecord`], one recorded duty period read from
//! the duty history, and [`ProposedDutyAssignment`], the ephemeral input to
//! the legality validator.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::rolling::minutes_to_hours;

/// Estimated flight time used when a proposed duty carries no estimate.
pub const DEFAULT_ESTIMATED_FLIGHT_MINUTES: i64 = 360;

/// One recorded duty period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyTimeRecord {
    /// Unique identifier for the duty record.
    pub id: String,
    /// The crew member who flew the duty.
    pub crew_id: String,
    /// The calendar date the duty is booked against.
    pub duty_date: NaiveDate,
    /// Report time (UTC).
    pub start_time: DateTime<Utc>,
    /// Release time (UTC); absent while the duty is still open.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Minutes of flight time.
    pub flight_minutes: i64,
    /// Minutes of duty time.
    pub duty_minutes: i64,
    /// Minutes of block time.
    #[serde(default)]
    pub block_minutes: i64,
    /// Number of flight segments flown.
    #[serde(default)]
    pub segment_count: u32,
    /// Whether the duty counts as a flight duty period.
    #[serde(default)]
    pub is_fdp: bool,
    /// Whether the duty crosses the window of circadian low (02:00-05:59).
    #[serde(default)]
    pub crosses_wocl: bool,
    /// Whether the duty includes an international sector.
    #[serde(default)]
    pub is_international: bool,
}

impl DutyTimeRecord {
    /// Checks the record's invariants.
    ///
    /// A record is valid when its minute counts are non-negative, its end
    /// (if any) is not before its start, and its flight time does not exceed
    /// its duty time.
    pub fn validate(&self) -> EngineResult<()> {
        if self.flight_minutes < 0 || self.duty_minutes < 0 || self.block_minutes < 0 {
            return Err(EngineError::InvalidDutyRecord {
                duty_id: self.id.clone(),
                message: "minute counts must not be negative".to_string(),
            });
        }

        if let Some(end) = self.end_time {
            if end < self.start_time {
                return Err(EngineError::InvalidDutyRecord {
                    duty_id: self.id.clone(),
                    message: "end time before start time".to_string(),
                });
            }
        }

        if self.flight_minutes > self.duty_minutes {
            return Err(EngineError::InvalidDutyRecord {
                duty_id: self.id.clone(),
                message: format!(
                    "flight minutes ({}) exceed duty minutes ({})",
                    self.flight_minutes, self.duty_minutes
                ),
            });
        }

        Ok(())
    }

    /// Length of the duty from report to release, in hours.
    ///
    /// Returns `None` when no end time has been recorded.
    pub fn fdp_hours(&self) -> Option<Decimal> {
        self.end_time
            .map(|end| minutes_to_hours((end - self.start_time).num_minutes()))
    }

    /// Flight time in hours.
    pub fn flight_hours(&self) -> Decimal {
        minutes_to_hours(self.flight_minutes)
    }

    /// Duty time in hours.
    pub fn duty_hours(&self) -> Decimal {
        minutes_to_hours(self.duty_minutes)
    }
}

/// A duty the scheduler would like to assign.
///
/// # Example
///
/// ```
/// use crew_rules_engine::models::ProposedDutyAssignment;
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let proposed = ProposedDutyAssignment {
///     aircraft_type: "B737".to_string(),
///     start_time: Utc.with_ymd_and_hms(2025, 3, 10, 6, 30, 0).unwrap(),
///     end_time: None,
///     estimated_flight_minutes: None,
///     segment_count: 2,
/// };
///
/// // No end and no estimate: six hours are assumed.
/// assert_eq!(proposed.fdp_hours(), Decimal::from(6));
/// assert_eq!(proposed.start_hour(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedDutyAssignment {
    /// Aircraft type the duty is flown on (e.g. "B737").
    pub aircraft_type: String,
    /// Proposed report time (UTC).
    pub start_time: DateTime<Utc>,
    /// Proposed release time (UTC), if known.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Estimated flight time in minutes.
    #[serde(default)]
    pub estimated_flight_minutes: Option<i64>,
    /// Number of planned flight segments.
    pub segment_count: u32,
}

impl ProposedDutyAssignment {
    /// Checks that the proposal describes a flyable duty: a non-negative
    /// flight estimate and an end (if any) that is not before the start.
    pub fn validate(&self) -> EngineResult<()> {
        if self.estimated_flight_minutes.is_some_and(|m| m < 0) {
            return Err(EngineError::InvalidAssignment {
                message: "estimated flight minutes must not be negative".to_string(),
            });
        }

        if let Some(end) = self.end_time {
            if end < self.start_time {
                return Err(EngineError::InvalidAssignment {
                    message: "end time before start time".to_string(),
                });
            }
        }

        Ok(())
    }

    /// The calendar date of the proposed report time.
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    /// The hour of day (0-23) of the proposed report time.
    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// Estimated flight minutes, defaulting to six hours.
    pub fn flight_minutes(&self) -> i64 {
        self.estimated_flight_minutes
            .unwrap_or(DEFAULT_ESTIMATED_FLIGHT_MINUTES)
    }

    /// Estimated flight time in hours.
    pub fn flight_hours(&self) -> Decimal {
        minutes_to_hours(self.flight_minutes())
    }

    /// Proposed flight duty period in hours.
    ///
    /// Uses the end time when supplied, otherwise start plus the estimated
    /// flight time.
    pub fn fdp_hours(&self) -> Decimal {
        match self.end_time {
            Some(end) => minutes_to_hours((end - self.start_time).num_minutes()),
            None => self.flight_hours(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn create_test_record() -> DutyTimeRecord {
        DutyTimeRecord {
            id: "duty_001".to_string(),
            crew_id: "crew_001".to_string(),
            duty_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            start_time: utc(2025, 3, 1, 8, 0),
            end_time: Some(utc(2025, 3, 1, 16, 30)),
            flight_minutes: 390,
            duty_minutes: 510,
            block_minutes: 420,
            segment_count: 3,
            is_fdp: true,
            crosses_wocl: false,
            is_international: false,
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(create_test_record().validate().is_ok());
    }

    #[test]
    fn test_end_before_start_is_invalid() {
        let mut record = create_test_record();
        record.end_time = Some(utc(2025, 3, 1, 7, 0));

        match record.validate() {
            Err(EngineError::InvalidDutyRecord { duty_id, message }) => {
                assert_eq!(duty_id, "duty_001");
                assert!(message.contains("end time before start time"));
            }
            other => panic!("Expected InvalidDutyRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_flight_exceeding_duty_is_invalid() {
        let mut record = create_test_record();
        record.flight_minutes = 600;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_negative_minutes_are_invalid() {
        let mut record = create_test_record();
        record.block_minutes = -5;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_fdp_hours_from_span() {
        let record = create_test_record();
        assert_eq!(record.fdp_hours(), Some(Decimal::new(85, 1))); // 8.5
        assert_eq!(record.flight_hours(), Decimal::new(65, 1)); // 6.5
        assert_eq!(record.duty_hours(), Decimal::new(85, 1));
    }

    #[test]
    fn test_open_record_has_no_fdp_hours() {
        let mut record = create_test_record();
        record.end_time = None;
        assert_eq!(record.fdp_hours(), None);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_proposed_fdp_uses_end_time_when_present() {
        let proposed = ProposedDutyAssignment {
            aircraft_type: "A320".to_string(),
            start_time: utc(2025, 3, 10, 22, 0),
            end_time: Some(utc(2025, 3, 11, 9, 0)),
            estimated_flight_minutes: Some(300),
            segment_count: 1,
        };

        assert_eq!(proposed.fdp_hours(), Decimal::from(11));
        assert_eq!(proposed.flight_hours(), Decimal::from(5));
        assert_eq!(proposed.start_hour(), 22);
        assert_eq!(
            proposed.start_date(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
    }

    #[test]
    fn test_proposed_end_before_start_is_invalid() {
        let proposed = ProposedDutyAssignment {
            aircraft_type: "B737".to_string(),
            start_time: utc(2025, 3, 10, 8, 0),
            end_time: Some(utc(2025, 3, 10, 6, 0)),
            estimated_flight_minutes: Some(300),
            segment_count: 1,
        };

        match proposed.validate() {
            Err(EngineError::InvalidAssignment { message }) => {
                assert!(message.contains("end time before start time"));
            }
            other => panic!("Expected InvalidAssignment, got {:?}", other),
        }
    }

    #[test]
    fn test_proposed_negative_flight_estimate_is_invalid() {
        let proposed = ProposedDutyAssignment {
            aircraft_type: "B737".to_string(),
            start_time: utc(2025, 3, 10, 8, 0),
            end_time: None,
            estimated_flight_minutes: Some(-120),
            segment_count: 1,
        };

        assert!(matches!(
            proposed.validate(),
            Err(EngineError::InvalidAssignment { .. })
        ));
    }

    #[test]
    fn test_deserialize_record_with_defaults() {
        let json = r#"{
            "id": "duty_009",
            "crew_id": "crew_001",
            "duty_date": "2025-03-02",
            "start_time": "2025-03-02T02:00:00Z",
            "flight_minutes": 120,
            "duty_minutes": 240
        }"#;

        let record: DutyTimeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.end_time, None);
        assert_eq!(record.segment_count, 0);
        assert!(!record.crosses_wocl);
        assert!(!record.is_international);
    }
}
