//! Configuration types for the crew rules engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files of a rule set directory, and the
//! assembled [`RuleSet`] the engine evaluates against.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::models::{CrewCategory, PublicHoliday, ReportTimeBucket, SegmentBucket};

/// Metadata about the rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSetMetadata {
    /// Short code identifying the rule set (e.g., "FAR117-CBA2025").
    pub code: String,
    /// The human-readable name of the rule set.
    pub name: String,
    /// Version stamped on every pay calculation.
    pub version: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

// ============================================================================
// regulatory.yaml
// ============================================================================

/// Maximum flight duty period table.
#[derive(Debug, Clone, Deserialize)]
pub struct FdpLimits {
    /// Limit used when the table has no cell for a combination.
    pub default_max_fdp_hours: Decimal,
    /// Max FDP hours keyed by report-time bucket, then segment bucket.
    pub table: BTreeMap<ReportTimeBucket, BTreeMap<SegmentBucket, Decimal>>,
}

/// One rest requirement tier, keyed on the previous duty's FDP.
#[derive(Debug, Clone, Deserialize)]
pub struct RestTier {
    /// Upper bound (inclusive) of previous FDP hours; `None` is unbounded.
    #[serde(default)]
    pub max_previous_fdp_hours: Option<Decimal>,
    /// Minimum rest required after such a duty.
    pub required_rest_hours: Decimal,
}

/// Rest requirements.
#[derive(Debug, Clone, Deserialize)]
pub struct RestRules {
    /// Requirement applied when the previous duty has no end time.
    pub missing_end_time_required_hours: Decimal,
    /// Tiers ordered by ascending `max_previous_fdp_hours`.
    pub tiers: Vec<RestTier>,
}

/// Rolling flight-time ceilings.
#[derive(Debug, Clone, Deserialize)]
pub struct RollingLimits {
    /// Ceiling over the trailing 28 days.
    pub max_flight_hours_28_days: Decimal,
    /// Ceiling over the trailing 365 days.
    pub max_flight_hours_365_days: Decimal,
}

/// Warning thresholds as percentages of a ceiling.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertThresholds {
    /// Percentage at which a MEDIUM approaching alert is raised.
    pub approaching_percent: Decimal,
    /// Percentage at which a HIGH approaching alert is raised.
    pub high_percent: Decimal,
}

/// Regulatory configuration from regulatory.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct RegulatoryConfig {
    pub fdp_limits: FdpLimits,
    pub rest: RestRules,
    pub rolling_limits: RollingLimits,
    pub alert_thresholds: AlertThresholds,
}

// ============================================================================
// pay_rules.yaml
// ============================================================================

/// Per diem configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PerDiemConfig {
    pub rule_id: String,
    /// Allowance per duty hour.
    pub hourly_rate: Decimal,
    /// Duty hours below which no per diem is paid.
    pub minimum_duty_hours: Decimal,
}

/// A premium paid as a multiple of the base hourly rate.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiplierPremium {
    pub rule_id: String,
    /// Total multiplier; the premium is the `multiplier - 1` share.
    pub multiplier: Decimal,
    /// Crew category codes the premium applies to, or "ALL". Empty applies
    /// to all.
    #[serde(default)]
    pub applies_to: Vec<String>,
}

impl MultiplierPremium {
    /// Whether the premium applies to a crew category.
    pub fn applies_to_category(&self, category: CrewCategory) -> bool {
        self.applies_to.is_empty()
            || self
                .applies_to
                .iter()
                .any(|c| c.eq_ignore_ascii_case("ALL") || c.eq_ignore_ascii_case(category.code()))
    }
}

/// A premium paid as a flat amount per unit.
#[derive(Debug, Clone, Deserialize)]
pub struct FlatPremium {
    pub rule_id: String,
    /// Amount per trip.
    pub flat_amount: Decimal,
}

/// Static premium definitions. A missing entry disables that premium.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PremiumsConfig {
    #[serde(default)]
    pub night: Option<MultiplierPremium>,
    #[serde(default)]
    pub holiday: Option<MultiplierPremium>,
    #[serde(default)]
    pub international: Option<FlatPremium>,
}

/// Monthly overtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OvertimeConfig {
    pub rule_id: String,
    /// Flight hours in the period above which overtime is paid.
    pub monthly_threshold_hours: Decimal,
    /// Total overtime multiplier.
    pub multiplier: Decimal,
}

/// One longevity tier.
#[derive(Debug, Clone, Deserialize)]
pub struct LongevityTier {
    /// First year of service in the tier (inclusive).
    pub min_years: u32,
    /// Last year of service in the tier (inclusive); `None` is unbounded.
    #[serde(default)]
    pub max_years: Option<u32>,
    /// Percentage of base pay paid as premium.
    pub percentage: Decimal,
}

impl LongevityTier {
    /// Whether `years` falls within the tier.
    pub fn contains(&self, years: u32) -> bool {
        years >= self.min_years && self.max_years.is_none_or(|max| years <= max)
    }
}

/// Longevity premium configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LongevityConfig {
    pub rule_id: String,
    pub tiers: Vec<LongevityTier>,
}

/// Pay rule configuration from pay_rules.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PayRulesConfig {
    /// Hourly flight pay by crew category, then position.
    pub base_rates: BTreeMap<CrewCategory, BTreeMap<String, Decimal>>,
    pub per_diem: PerDiemConfig,
    #[serde(default)]
    pub premiums: PremiumsConfig,
    #[serde(default)]
    pub overtime: Option<OvertimeConfig>,
    /// Monthly guarantee by position.
    #[serde(default)]
    pub guarantees: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub longevity: Option<LongevityConfig>,
    #[serde(default)]
    pub public_holidays: Vec<PublicHoliday>,
}

// ============================================================================
// Assembled rule set
// ============================================================================

/// The complete rule set loaded from a configuration directory.
///
/// Loaded once and shared immutably; every computation receives it
/// explicitly.
#[derive(Debug, Clone)]
pub struct RuleSet {
    metadata: RuleSetMetadata,
    regulatory: RegulatoryConfig,
    pay_rules: PayRulesConfig,
}

impl RuleSet {
    /// Creates a new RuleSet from its component parts.
    pub fn new(
        metadata: RuleSetMetadata,
        regulatory: RegulatoryConfig,
        pay_rules: PayRulesConfig,
    ) -> Self {
        let mut pay_rules = pay_rules;
        for by_position in pay_rules.base_rates.values_mut() {
            *by_position = uppercase_keys(std::mem::take(by_position));
        }
        pay_rules.guarantees = uppercase_keys(std::mem::take(&mut pay_rules.guarantees));
        if let Some(longevity) = pay_rules.longevity.as_mut() {
            longevity.tiers.sort_by_key(|t| t.min_years);
        }
        pay_rules.public_holidays.sort_by_key(|h| h.date);
        Self {
            metadata,
            regulatory,
            pay_rules,
        }
    }

    /// Returns the rule set metadata.
    pub fn metadata(&self) -> &RuleSetMetadata {
        &self.metadata
    }

    /// Returns the version stamped on calculations.
    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// Returns the regulatory configuration.
    pub fn regulatory(&self) -> &RegulatoryConfig {
        &self.regulatory
    }

    /// Returns the pay rule configuration.
    pub fn pay_rules(&self) -> &PayRulesConfig {
        &self.pay_rules
    }

    /// Looks up the FDP table cell, if one exists.
    pub fn fdp_table_cell(
        &self,
        segments: SegmentBucket,
        report_time: ReportTimeBucket,
    ) -> Option<Decimal> {
        self.regulatory
            .fdp_limits
            .table
            .get(&report_time)
            .and_then(|row| row.get(&segments))
            .copied()
    }

    /// Max FDP hours for a combination, falling back to the table default.
    pub fn max_fdp_hours(&self, segments: SegmentBucket, report_time: ReportTimeBucket) -> Decimal {
        self.fdp_table_cell(segments, report_time)
            .unwrap_or(self.regulatory.fdp_limits.default_max_fdp_hours)
    }

    /// Minimum rest required after a duty of `previous_fdp_hours`.
    pub fn required_rest_hours(&self, previous_fdp_hours: Decimal) -> Decimal {
        let rest = &self.regulatory.rest;
        rest.tiers
            .iter()
            .find(|t| t.max_previous_fdp_hours.is_none_or(|max| previous_fdp_hours <= max))
            .or(rest.tiers.last())
            .map(|t| t.required_rest_hours)
            .unwrap_or(rest.missing_end_time_required_hours)
    }

    /// Rest required when the previous duty has no recorded end.
    pub fn missing_end_time_rest_hours(&self) -> Decimal {
        self.regulatory.rest.missing_end_time_required_hours
    }

    /// The 28-day flight-hour ceiling.
    pub fn limit_28_days(&self) -> Decimal {
        self.regulatory.rolling_limits.max_flight_hours_28_days
    }

    /// The 365-day flight-hour ceiling.
    pub fn limit_365_days(&self) -> Decimal {
        self.regulatory.rolling_limits.max_flight_hours_365_days
    }

    /// Static hourly rate for a category and position.
    pub fn base_rate(&self, category: CrewCategory, position: &str) -> Option<Decimal> {
        self.pay_rules
            .base_rates
            .get(&category)
            .and_then(|by_position| by_position.get(&position.to_ascii_uppercase()))
            .copied()
    }

    /// Static monthly guarantee for a position.
    pub fn guarantee(&self, position: &str) -> Option<Decimal> {
        self.pay_rules
            .guarantees
            .get(&position.to_ascii_uppercase())
            .copied()
    }

    /// The longevity tier containing `years_of_service`.
    pub fn longevity_tier(&self, years_of_service: u32) -> Option<&LongevityTier> {
        self.pay_rules
            .longevity
            .as_ref()
            .and_then(|l| l.tiers.iter().find(|t| t.contains(years_of_service)))
    }

    /// Checks if a date is a configured public holiday.
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        crate::models::is_public_holiday(&self.pay_rules.public_holidays, date)
    }
}

/// Position keys are matched case-insensitively.
fn uppercase_keys(map: BTreeMap<String, Decimal>) -> BTreeMap<String, Decimal> {
    map.into_iter()
        .map(|(k, v)| (k.to_ascii_uppercase(), v))
        .collect()
}
