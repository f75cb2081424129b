//! Base flight pay.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AuditStep, AuditWarning, PayComponent, PayContext, PayRuleType};

use super::{BaseRateRule, ComponentResult, display, round_money};

/// Calculates base pay as flight hours times the hourly rate.
///
/// # Arguments
///
/// * `context` - The aggregated period context
/// * `rule` - The resolved base rate for the crew member's category and position
/// * `step_number` - The audit step number to assign
///
/// # Returns
///
/// The base pay line. When no rate exists for the crew member's position the
/// amount is zero and a `MISSING_BASE_RATE` warning is attached.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::pay::{BaseRateRule, calculate_base_pay};
/// # use crew_rules_engine::models::{CrewCategory, CrewMember, CrewStatus, PayContext, PayPeriod};
/// # use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// # let crew = CrewMember {
/// #     id: "crew_001".to_string(),
/// #     employee_number: "E1001".to_string(),
/// #     first_name: "Test".to_string(),
/// #     last_name: "Captain".to_string(),
/// #     category: CrewCategory::Pilot,
/// #     position: "CAPTAIN".to_string(),
/// #     base: "JFK".to_string(),
/// #     hire_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
/// #     status: CrewStatus::Active,
/// # };
/// # let period = PayPeriod::new(
/// #     NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
/// #     NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
/// # ).unwrap();
/// let context = PayContext {
///     crew,
///     period,
///     flight_hours: Decimal::from_str("65.5").unwrap(),
///     duty_hours: Decimal::from(95),
///     block_hours: Decimal::ZERO,
///     duty_days: 12,
///     night_hours: Decimal::ZERO,
///     international_trips: 0,
///     holiday_hours: Decimal::ZERO,
///     years_of_service: 1,
/// };
/// let rule = BaseRateRule {
///     rule_id: "BASE-PILOT-CAPTAIN".to_string(),
///     hourly_rate: Decimal::from(250),
/// };
///
/// let result = calculate_base_pay(&context, Some(&rule), 1);
/// assert_eq!(result.component.amount, Decimal::from_str("16375.00").unwrap());
/// ```
pub fn calculate_base_pay(
    context: &PayContext,
    rule: Option<&BaseRateRule>,
    step_number: u32,
) -> ComponentResult {
    let Some(rule) = rule else {
        warn!(
            crew_id = %context.crew.id,
            category = %context.crew.category,
            position = %context.crew.position,
            "No base rate configured"
        );
        let description = format!(
            "No base rate configured for {} {}",
            context.crew.category, context.crew.position
        );
        return ComponentResult {
            component: PayComponent::zero(PayRuleType::BasePay, "Base Pay", description.clone()),
            audit_step: AuditStep {
                step_number,
                rule_id: "base_pay".to_string(),
                rule_name: "Base Pay".to_string(),
                input: serde_json::json!({
                    "category": context.crew.category,
                    "position": context.crew.position,
                    "flight_hours": context.flight_hours.to_string()
                }),
                output: serde_json::json!({
                    "amount": "0",
                    "source": "missing"
                }),
                reasoning: description.clone(),
            },
            warning: Some(AuditWarning::new("MISSING_BASE_RATE", description, "high")),
        };
    };

    let amount = round_money(context.flight_hours * rule.hourly_rate);
    let description = format!(
        "{}h flight time at ${}/h",
        display(context.flight_hours),
        display(rule.hourly_rate)
    );

    ComponentResult {
        component: PayComponent {
            component_type: PayRuleType::BasePay,
            name: "Base Pay".to_string(),
            hours: context.flight_hours,
            rate: rule.hourly_rate,
            amount,
            description: description.clone(),
            rule_id: Some(rule.rule_id.clone()),
        },
        audit_step: AuditStep {
            step_number,
            rule_id: rule.rule_id.clone(),
            rule_name: "Base Pay".to_string(),
            input: serde_json::json!({
                "flight_hours": context.flight_hours.to_string(),
                "hourly_rate": rule.hourly_rate.to_string()
            }),
            output: serde_json::json!({
                "amount": amount.to_string()
            }),
            reasoning: format!("{description} = ${amount}"),
        },
        warning: None,
    }
}
