//! Compliance monitoring models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Severity;

/// The kind of compliance alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    /// A rolling total is at or above a warning threshold.
    ApproachingLimit,
    /// A rolling total has reached its ceiling.
    LimitExceeded,
    /// The crew member must rest before further duty.
    RestRequired,
}

/// The rolling window an alert refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollingWindow {
    /// Trailing 28 days.
    Days28,
    /// Trailing 365 days.
    Days365,
}

impl RollingWindow {
    /// Window length in days.
    pub fn days(&self) -> i64 {
        match self {
            RollingWindow::Days28 => 28,
            RollingWindow::Days365 => 365,
        }
    }
}

/// A graded compliance alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceAlert {
    /// Unique identifier for the alert.
    pub alert_id: Uuid,
    /// The crew member concerned.
    pub crew_id: String,
    /// What kind of alert this is.
    pub alert_type: AlertType,
    /// How urgent it is.
    pub severity: Severity,
    /// Which rolling window triggered it.
    pub window: RollingWindow,
    /// Current total in the window.
    pub current_value: Decimal,
    /// The ceiling for the window.
    pub limit_value: Decimal,
    /// Human-readable summary.
    pub message: String,
    /// What the scheduler should do.
    pub recommended_action: String,
}

/// A per-crew compliance snapshot recorded by the monitor sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSnapshot {
    /// Unique identifier for the snapshot.
    pub snapshot_id: Uuid,
    /// The crew member concerned.
    pub crew_id: String,
    /// Date the snapshot was evaluated for.
    pub as_of_date: NaiveDate,
    /// Flight hours in the trailing 28 days.
    pub flight_hours_28_days: Decimal,
    /// Flight hours in the trailing 365 days.
    pub flight_hours_365_days: Decimal,
    /// True while the 28-day total is below its ceiling.
    pub rest_compliance: bool,
    /// True while the 365-day total is below its ceiling.
    pub fdp_compliance: bool,
    /// Number of alerts raised for the crew member.
    pub alert_count: usize,
}

/// Result of a compliance sweep over the active pilot population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Date the sweep was evaluated for.
    pub as_of_date: NaiveDate,
    /// Crew members successfully checked.
    pub crew_checked: usize,
    /// Crew members skipped because their check failed.
    pub crew_failed: Vec<String>,
    /// All alerts raised, grouped by crew member in check order.
    pub alerts: Vec<ComplianceAlert>,
}

/// Result of the fast assignment pre-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentClearance {
    /// The crew member concerned.
    pub crew_id: String,
    /// Whether the proposed hours fit both ceilings.
    pub is_clear: bool,
    /// Why the crew member is or is not clear.
    pub reason: String,
    /// 28-day total including the proposed hours.
    pub projected_28_days: Decimal,
    /// 365-day total including the proposed hours.
    pub projected_365_days: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&AlertType::ApproachingLimit).unwrap(),
            "\"APPROACHING_LIMIT\""
        );
        assert_eq!(
            serde_json::to_string(&AlertType::LimitExceeded).unwrap(),
            "\"LIMIT_EXCEEDED\""
        );
        assert_eq!(
            serde_json::to_string(&AlertType::RestRequired).unwrap(),
            "\"REST_REQUIRED\""
        );
    }

    #[test]
    fn test_window_days() {
        assert_eq!(RollingWindow::Days28.days(), 28);
        assert_eq!(RollingWindow::Days365.days(), 365);
    }

    #[test]
    fn test_alert_serialization_contains_values() {
        let alert = ComplianceAlert {
            alert_id: Uuid::nil(),
            crew_id: "crew_001".to_string(),
            alert_type: AlertType::LimitExceeded,
            severity: Severity::Critical,
            window: RollingWindow::Days28,
            current_value: Decimal::new(1005, 1),
            limit_value: Decimal::from(100),
            message: "28-day limit exceeded".to_string(),
            recommended_action: "Remove from schedule".to_string(),
        };

        let json = serde_json::to_string(&alert).unwrap();
        assert!(json.contains("\"severity\":\"CRITICAL\""));
        assert!(json.contains("\"window\":\"days28\""));
        assert!(json.contains("\"current_value\":\"100.5\""));
    }
}
