//! Configuration loading functionality.
//!
//! This module provides the [`RuleSetLoader`] type for loading a rule set
//! from YAML files and validating it before the engine serves requests.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{PayRulesConfig, RegulatoryConfig, RuleSet, RuleSetMetadata};

/// Loads a rule set from a configuration directory.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── ruleset.yaml     # Rule set metadata and version
/// ├── regulatory.yaml  # FDP table, rest tiers, rolling ceilings, alert thresholds
/// └── pay_rules.yaml   # Rates, premiums, overtime, guarantees, holidays
/// ```
///
/// # Example
///
/// ```no_run
/// use crew_rules_engine::config::RuleSetLoader;
///
/// let rule_set = RuleSetLoader::load("./config/default")?;
/// println!("Loaded rule set {} v{}", rule_set.metadata().name, rule_set.version());
/// # Ok::<(), crew_rules_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// Loads and validates the rule set in `path`.
    ///
    /// # Returns
    ///
    /// Returns the [`RuleSet`] on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - The content is inconsistent (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<RuleSet> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<RuleSetMetadata>(&path.join("ruleset.yaml"))?;
        let regulatory = Self::load_yaml::<RegulatoryConfig>(&path.join("regulatory.yaml"))?;
        let pay_rules = Self::load_yaml::<PayRulesConfig>(&path.join("pay_rules.yaml"))?;

        let rule_set = RuleSet::new(metadata, regulatory, pay_rules);
        validate(&rule_set)?;

        info!(
            code = %rule_set.metadata().code,
            version = %rule_set.version(),
            path = %path.display(),
            "Loaded rule set"
        );

        Ok(rule_set)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig {
        message: message.into(),
    }
}

/// Semantic checks serde cannot express.
fn validate(rule_set: &RuleSet) -> EngineResult<()> {
    let regulatory = rule_set.regulatory();

    let fdp = &regulatory.fdp_limits;
    if fdp.table.is_empty() {
        return Err(invalid("FDP limit table is empty"));
    }
    if fdp.default_max_fdp_hours <= Decimal::ZERO {
        return Err(invalid("default_max_fdp_hours must be positive"));
    }
    for (report_time, row) in &fdp.table {
        if let Some((segments, _)) = row.iter().find(|(_, hours)| **hours <= Decimal::ZERO) {
            return Err(invalid(format!(
                "FDP limit for {} x {} must be positive",
                report_time.label(),
                segments.label()
            )));
        }
    }

    let rest = &regulatory.rest;
    if rest.tiers.is_empty() {
        return Err(invalid("rest tiers are empty"));
    }
    if rest.missing_end_time_required_hours <= Decimal::ZERO
        || rest.tiers.iter().any(|t| t.required_rest_hours <= Decimal::ZERO)
    {
        return Err(invalid("required rest hours must be positive"));
    }
    let mut previous_bound: Option<Decimal> = None;
    for (index, tier) in rest.tiers.iter().enumerate() {
        let is_last = index + 1 == rest.tiers.len();
        match tier.max_previous_fdp_hours {
            None if !is_last => {
                return Err(invalid("only the last rest tier may be unbounded"));
            }
            Some(bound) if previous_bound.is_some_and(|prev| bound <= prev) => {
                return Err(invalid("rest tiers must be in ascending FDP order"));
            }
            _ => previous_bound = tier.max_previous_fdp_hours,
        }
    }

    let limits = &regulatory.rolling_limits;
    if limits.max_flight_hours_28_days <= Decimal::ZERO
        || limits.max_flight_hours_365_days <= Decimal::ZERO
    {
        return Err(invalid("rolling flight-hour ceilings must be positive"));
    }

    let thresholds = &regulatory.alert_thresholds;
    let hundred = Decimal::ONE_HUNDRED;
    if thresholds.approaching_percent <= Decimal::ZERO
        || thresholds.approaching_percent >= thresholds.high_percent
        || thresholds.high_percent >= hundred
    {
        return Err(invalid(
            "alert thresholds must satisfy 0 < approaching_percent < high_percent < 100",
        ));
    }

    let pay = rule_set.pay_rules();
    let negative_rate = pay
        .base_rates
        .values()
        .flat_map(|by_position| by_position.iter())
        .find(|(_, rate)| **rate < Decimal::ZERO);
    if let Some((position, _)) = negative_rate {
        return Err(invalid(format!("base rate for {position} is negative")));
    }
    if pay.per_diem.hourly_rate < Decimal::ZERO || pay.per_diem.minimum_duty_hours < Decimal::ZERO
    {
        return Err(invalid("per diem rate and minimum must not be negative"));
    }

    if let Some(longevity) = &pay.longevity {
        // Tiers are sorted by min_years when the rule set is assembled.
        for (index, tier) in longevity.tiers.iter().enumerate() {
            if tier.max_years.is_some_and(|max| max < tier.min_years) {
                return Err(invalid(format!(
                    "longevity tier starting at {} years ends before it starts",
                    tier.min_years
                )));
            }
            if let Some(next) = longevity.tiers.get(index + 1) {
                let overlaps = match tier.max_years {
                    None => true,
                    Some(max) => next.min_years <= max,
                };
                if overlaps {
                    return Err(invalid(format!(
                        "longevity tiers starting at {} and {} years overlap",
                        tier.min_years, next.min_years
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrewCategory, ReportTimeBucket, SegmentBucket};
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        concat!(env!("CARGO_MANIFEST_DIR"), "/config/default")
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// Copies the default rule set into a scratch directory, replacing one
    /// file's content.
    fn scratch_rule_set(file: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("crew-rules-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        for name in ["ruleset.yaml", "regulatory.yaml", "pay_rules.yaml"] {
            fs::copy(Path::new(config_path()).join(name), dir.join(name)).unwrap();
        }
        fs::write(dir.join(file), content).unwrap();
        dir
    }

    fn default_regulatory_with(find: &str, replace: &str) -> String {
        let original =
            fs::read_to_string(Path::new(config_path()).join("regulatory.yaml")).unwrap();
        assert!(original.contains(find), "fixture text not found: {find}");
        original.replacen(find, replace, 1)
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = RuleSetLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let rule_set = result.unwrap();
        assert_eq!(rule_set.metadata().code, "FAR117-CBA2025");
        assert!(!rule_set.version().is_empty());
    }

    #[test]
    fn test_fdp_table_lookup() {
        let rule_set = RuleSetLoader::load(config_path()).unwrap();

        assert_eq!(
            rule_set.fdp_table_cell(SegmentBucket::Two, ReportTimeBucket::H0600To0659),
            Some(dec("13"))
        );
        assert_eq!(
            rule_set.max_fdp_hours(SegmentBucket::SixPlus, ReportTimeBucket::H1700To2359),
            dec("9")
        );
    }

    #[test]
    fn test_rest_tiers() {
        let rule_set = RuleSetLoader::load(config_path()).unwrap();

        assert_eq!(rule_set.required_rest_hours(dec("8")), dec("10"));
        assert_eq!(rule_set.required_rest_hours(dec("9")), dec("10"));
        assert_eq!(rule_set.required_rest_hours(dec("9.01")), dec("11"));
        assert_eq!(rule_set.required_rest_hours(dec("13")), dec("11"));
        assert_eq!(rule_set.required_rest_hours(dec("13.5")), dec("12"));
        assert_eq!(rule_set.missing_end_time_rest_hours(), dec("10"));
    }

    #[test]
    fn test_rolling_limits() {
        let rule_set = RuleSetLoader::load(config_path()).unwrap();
        assert_eq!(rule_set.limit_28_days(), dec("100"));
        assert_eq!(rule_set.limit_365_days(), dec("1000"));
    }

    #[test]
    fn test_pay_lookups_are_case_insensitive() {
        let rule_set = RuleSetLoader::load(config_path()).unwrap();

        assert_eq!(
            rule_set.base_rate(CrewCategory::Pilot, "captain"),
            Some(dec("250.00"))
        );
        assert_eq!(rule_set.base_rate(CrewCategory::Pilot, "PURSER"), None);
        assert_eq!(rule_set.guarantee("Captain"), Some(dec("18750.00")));
        assert_eq!(rule_set.guarantee("FLIGHT_ENGINEER"), None);
    }

    #[test]
    fn test_longevity_tier_lookup() {
        let rule_set = RuleSetLoader::load(config_path()).unwrap();

        assert!(rule_set.longevity_tier(2).is_none());
        assert_eq!(rule_set.longevity_tier(5).unwrap().percentage, dec("2"));
        assert_eq!(rule_set.longevity_tier(40).unwrap().max_years, None);
    }

    #[test]
    fn test_public_holidays() {
        let rule_set = RuleSetLoader::load(config_path()).unwrap();
        assert!(rule_set.is_public_holiday(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()));
        assert!(!rule_set.is_public_holiday(NaiveDate::from_ymd_opt(2025, 12, 26).unwrap()));
    }

    // ==========================================================================
    // Load failures
    // ==========================================================================

    #[test]
    fn test_missing_directory_returns_not_found() {
        let result = RuleSetLoader::load("./config/does-not-exist");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.ends_with("ruleset.yaml"));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_yaml_returns_parse_error() {
        let dir = scratch_rule_set("pay_rules.yaml", "base_rates: [unterminated");
        let result = RuleSetLoader::load(&dir);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_non_positive_ceiling_is_invalid() {
        let regulatory = default_regulatory_with(
            "max_flight_hours_28_days: 100",
            "max_flight_hours_28_days: 0",
        );
        let dir = scratch_rule_set("regulatory.yaml", &regulatory);
        let result = RuleSetLoader::load(&dir);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_unordered_rest_tiers_are_invalid() {
        let regulatory = default_regulatory_with(
            "max_previous_fdp_hours: 13",
            "max_previous_fdp_hours: 8",
        );
        let dir = scratch_rule_set("regulatory.yaml", &regulatory);
        match RuleSetLoader::load(&dir) {
            Err(EngineError::InvalidConfig { message }) => {
                assert!(message.contains("ascending"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
        let _ = fs::remove_dir_all(dir);
    }
}
