//! Pay rules and the pay calculator.
//!
//! The rules engine is a set of stateless functions, one per component
//! (base pay, per diem, premiums, overtime and guarantee), each taking the
//! aggregated [`PayContext`](crate::models::PayContext) and the resolved
//! rule for that component and returning the component line together with
//! the audit step that explains it. [`evaluate_pay`] runs them in order.
//! [`PayCalculator`] aggregates duty records into a context, loads the
//! dynamic rules from the store and assembles the final
//! [`PayCalculation`](crate::models::PayCalculation).

mod base_pay;
mod calculator;
mod evaluate;
mod guarantee;
mod overtime;
mod per_diem;
mod premiums;
mod rules;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AuditStep, AuditWarning, PayComponent};

pub use base_pay::calculate_base_pay;
pub use calculator::{EstimatedHours, PayCalculator, aggregate_totals};
pub use evaluate::{PayEvaluation, evaluate_pay};
pub use guarantee::calculate_guarantee;
pub use overtime::calculate_overtime;
pub use per_diem::calculate_per_diem;
pub use premiums::{
    NIGHT_HOURS_CAP_PER_DUTY_MINUTES, calculate_holiday_premium,
    calculate_international_premium, calculate_longevity_premium, calculate_night_premium,
};
pub use rules::{
    BaseRateRule, FlatRule, GuaranteeRule, LongevityRule, MultiplierRule, OvertimeRule,
    PerDiemRule, ResolvedPayRules, resolve_rules,
};

/// The outcome of evaluating one pay component.
#[derive(Debug, Clone)]
pub struct ComponentResult {
    /// The breakdown line.
    pub component: PayComponent,
    /// The audit step recording the decision.
    pub audit_step: AuditStep,
    /// Set when the component defaulted to zero for lack of a rule.
    pub warning: Option<AuditWarning>,
}

/// Rounds a currency amount to cents, half away from zero, always carrying
/// two decimal places.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::pay::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("10.005").unwrap()), Decimal::from_str("10.01").unwrap());
/// assert_eq!(round_money(Decimal::from_str("16375.0").unwrap()).to_string(), "16375.00");
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Formats a decimal for audit reasoning text.
pub(crate) fn display(value: Decimal) -> Decimal {
    value.round_dp(2).normalize()
}
