//! Pay calculation models.
//!
//! This module contains the [`PayCalculation`] type and the structures that
//! make up a compensation breakdown: the [`PayContext`] the rules are
//! evaluated against, per-component [`PayComponent`] lines, the applied-rule
//! list, per-duty summaries and the audit trace.
//!
//! A `PayCalculation` deliberately carries no timestamps or random ids, so
//! computing it twice over the same inputs yields an identical value.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CrewMember, PayPeriod, PayRuleType};

/// The evaluation context handed to the pay rules engine.
///
/// Hours are already aggregated for the period; the rules engine never reads
/// duty records itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayContext {
    /// The crew member being paid.
    pub crew: CrewMember,
    /// The period being paid.
    pub period: PayPeriod,
    /// Flight hours in the period.
    pub flight_hours: Decimal,
    /// Duty hours in the period.
    pub duty_hours: Decimal,
    /// Block hours in the period.
    pub block_hours: Decimal,
    /// Distinct calendar days with duty.
    pub duty_days: u32,
    /// Estimated hours worked inside the circadian-low window.
    pub night_hours: Decimal,
    /// Number of international duties.
    pub international_trips: u32,
    /// Flight hours flown on public holidays.
    pub holiday_hours: Decimal,
    /// Whole years of service at the end of the period.
    pub years_of_service: u32,
}

/// Aggregated hours for a pay period.
///
/// # Example
///
/// ```
/// use crew_rules_engine::models::PeriodTotals;
///
/// let totals = PeriodTotals::default();
/// assert_eq!(totals.duty_days, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Total flight hours.
    pub flight_hours: Decimal,
    /// Total duty hours.
    pub duty_hours: Decimal,
    /// Total block hours.
    pub block_hours: Decimal,
    /// Distinct calendar days with duty.
    pub duty_days: u32,
    /// Estimated night hours (capped at 4h per flagged duty).
    pub night_hours: Decimal,
    /// Number of international duties.
    pub international_trips: u32,
    /// Flight hours flown on public holidays.
    pub holiday_hours: Decimal,
    /// Whole years of service at the end of the period.
    pub years_of_service: u32,
}

/// One line of the compensation breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayComponent {
    /// Which component this line belongs to.
    pub component_type: PayRuleType,
    /// Short name, e.g. "Base Pay" or "Night Premium".
    pub name: String,
    /// Hours (or units) the amount was computed over.
    pub hours: Decimal,
    /// Rate applied per hour or unit.
    pub rate: Decimal,
    /// Amount, rounded to cents.
    pub amount: Decimal,
    /// Human-readable explanation of how the amount was reached.
    pub description: String,
    /// The rule that produced the line, when one applied.
    pub rule_id: Option<String>,
}

impl PayComponent {
    /// A zero-amount line, used when a component does not apply.
    pub fn zero(
        component_type: PayRuleType,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            component_type,
            name: name.into(),
            hours: Decimal::ZERO,
            rate: Decimal::ZERO,
            amount: Decimal::ZERO,
            description: description.into(),
            rule_id: None,
        }
    }
}

/// The per-component compensation breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBreakdown {
    /// Hourly flight pay.
    pub base_pay: PayComponent,
    /// Per diem allowance.
    pub per_diem: PayComponent,
    /// Premiums that applied; empty when none did.
    pub premiums: Vec<PayComponent>,
    /// Overtime above the monthly threshold.
    pub overtime: PayComponent,
    /// Guarantee top-up.
    pub guarantee: PayComponent,
}

impl PayBreakdown {
    /// Sum of all premium amounts.
    pub fn premium_total(&self) -> Decimal {
        self.premiums.iter().map(|p| p.amount).sum()
    }

    /// Sum of every component amount.
    pub fn total(&self) -> Decimal {
        self.base_pay.amount
            + self.per_diem.amount
            + self.premium_total()
            + self.overtime.amount
            + self.guarantee.amount
    }

    /// All components in reporting order.
    pub fn components(&self) -> impl Iterator<Item = &PayComponent> {
        [&self.base_pay, &self.per_diem]
            .into_iter()
            .chain(self.premiums.iter())
            .chain([&self.overtime, &self.guarantee])
    }
}

/// A rule that contributed a non-zero amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    /// Identifier of the rule.
    pub rule_id: String,
    /// Name of the component line it produced.
    pub rule_name: String,
    /// The component type.
    pub rule_type: PayRuleType,
    /// Amount it contributed.
    pub amount: Decimal,
}

/// Summary of one duty record included in a pay calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutySummary {
    /// The duty record id.
    pub duty_id: String,
    /// Calendar date of the duty.
    pub duty_date: NaiveDate,
    /// Flight hours.
    pub flight_hours: Decimal,
    /// Duty hours.
    pub duty_hours: Decimal,
    /// Whether the duty touched the circadian-low window.
    pub crosses_wocl: bool,
    /// Whether the duty was international.
    pub is_international: bool,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate missing or unusable rules that did not stop the
/// calculation but defaulted a component to zero or to static values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning, e.g. "MISSING_BASE_RATE".
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: &str, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// The audit trace for a pay calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a pay calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayCalculation {
    /// The crew member paid.
    pub crew_id: String,
    /// The period paid.
    pub period: PayPeriod,
    /// Whether the totals are estimates rather than recorded duty.
    pub is_estimate: bool,
    /// Aggregated hours.
    pub totals: PeriodTotals,
    /// Per-component breakdown.
    pub breakdown: PayBreakdown,
    /// Rules that contributed a non-zero amount.
    pub applied_rules: Vec<AppliedRule>,
    /// One entry per duty record; empty for estimates.
    pub duty_records: Vec<DutySummary>,
    /// Sum of all breakdown amounts.
    pub total_compensation: Decimal,
    /// Every rule decision in order, plus warnings.
    pub audit_trace: AuditTrace,
    /// Version of this crate.
    pub engine_version: String,
    /// Version of the rule set the amounts were computed under.
    pub rule_set_version: String,
}
