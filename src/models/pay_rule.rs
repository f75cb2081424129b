//! Dynamic pay rule definitions.
//!
//! Pay rules held by the store carry an opaque JSON parameter bundle; the
//! pay rules engine deserializes it into the typed parameter struct of the
//! component the rule drives.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CrewCategory;

/// The pay component a rule drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayRuleType {
    /// Hourly flight pay.
    BasePay,
    /// Hourly allowance for time away from base.
    PerDiem,
    /// Night, holiday, international and longevity premiums.
    Premium,
    /// Pay above the monthly flight-hour threshold.
    Overtime,
    /// Minimum monthly compensation floor.
    Guarantee,
}

impl std::fmt::Display for PayRuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PayRuleType::BasePay => "BASE_PAY",
            PayRuleType::PerDiem => "PER_DIEM",
            PayRuleType::Premium => "PREMIUM",
            PayRuleType::Overtime => "OVERTIME",
            PayRuleType::Guarantee => "GUARANTEE",
        };
        f.write_str(label)
    }
}

/// A pay rule definition as held by the store.
///
/// # Example
///
/// ```
/// use crew_rules_engine::models::{PayRuleDefinition, PayRuleType};
///
/// let json = r#"{
///     "rule_id": "cba-2025-base-captain",
///     "rule_name": "2025 CBA captain rate",
///     "rule_type": "BASE_PAY",
///     "crew_type": "PILOT",
///     "position": "CAPTAIN",
///     "effective_date": "2025-01-01",
///     "parameters": {"hourly_rate": "262.50"}
/// }"#;
///
/// let rule: PayRuleDefinition = serde_json::from_str(json).unwrap();
/// assert_eq!(rule.rule_type, PayRuleType::BasePay);
/// assert_eq!(rule.expiration_date, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRuleDefinition {
    /// Unique identifier for the rule.
    pub rule_id: String,
    /// Human-readable name.
    pub rule_name: String,
    /// The component the rule drives.
    pub rule_type: PayRuleType,
    /// Crew category the rule applies to; `None` applies to all.
    #[serde(default)]
    pub crew_type: Option<CrewCategory>,
    /// Position the rule applies to; `None` applies to all.
    #[serde(default)]
    pub position: Option<String>,
    /// First date the rule applies.
    pub effective_date: NaiveDate,
    /// Last date the rule applies; `None` is open-ended.
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    /// Opaque parameter bundle (rate, multiplier, threshold...).
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl PayRuleDefinition {
    /// Whether the rule applies to the given crew and period start.
    ///
    /// A rule applies when its crew type and position are unset or match,
    /// and `effective_date <= period_start <= expiration_date`.
    pub fn applies_to(
        &self,
        category: CrewCategory,
        position: &str,
        period_start: NaiveDate,
    ) -> bool {
        let crew_matches = self.crew_type.is_none_or(|c| c == category);
        let position_matches = self
            .position
            .as_deref()
            .is_none_or(|p| p.eq_ignore_ascii_case(position));
        let in_window = self.effective_date <= period_start
            && self.expiration_date.is_none_or(|exp| period_start <= exp);

        crew_matches && position_matches && in_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_rule(
        crew_type: Option<CrewCategory>,
        position: Option<&str>,
        expiration_date: Option<NaiveDate>,
    ) -> PayRuleDefinition {
        PayRuleDefinition {
            rule_id: "rule_001".to_string(),
            rule_name: "Test rule".to_string(),
            rule_type: PayRuleType::BasePay,
            crew_type,
            position: position.map(str::to_string),
            effective_date: date(2025, 1, 1),
            expiration_date,
            parameters: serde_json::json!({"hourly_rate": "250.00"}),
        }
    }

    #[test]
    fn test_rule_applies_within_window() {
        let rule = create_rule(Some(CrewCategory::Pilot), Some("CAPTAIN"), None);
        assert!(rule.applies_to(CrewCategory::Pilot, "CAPTAIN", date(2025, 3, 1)));
        assert!(rule.applies_to(CrewCategory::Pilot, "captain", date(2025, 1, 1)));
    }

    #[test]
    fn test_rule_not_yet_effective() {
        let rule = create_rule(None, None, None);
        assert!(!rule.applies_to(CrewCategory::Pilot, "CAPTAIN", date(2024, 12, 31)));
    }

    #[test]
    fn test_rule_expired() {
        let rule = create_rule(None, None, Some(date(2025, 2, 28)));
        assert!(rule.applies_to(CrewCategory::Pilot, "CAPTAIN", date(2025, 2, 28)));
        assert!(!rule.applies_to(CrewCategory::Pilot, "CAPTAIN", date(2025, 3, 1)));
    }

    #[test]
    fn test_rule_wrong_category_or_position() {
        let rule = create_rule(Some(CrewCategory::Pilot), Some("CAPTAIN"), None);
        assert!(!rule.applies_to(CrewCategory::FlightAttendant, "CAPTAIN", date(2025, 3, 1)));
        assert!(!rule.applies_to(CrewCategory::Pilot, "FIRST_OFFICER", date(2025, 3, 1)));
    }

    #[test]
    fn test_rule_type_display_matches_wire_name() {
        assert_eq!(PayRuleType::PerDiem.to_string(), "PER_DIEM");
        assert_eq!(
            serde_json::to_string(&PayRuleType::PerDiem).unwrap(),
            "\"PER_DIEM\""
        );
    }
}
