//! Per diem allowance.

use rust_decimal::Decimal;

use crate::models::{AuditStep, PayComponent, PayContext, PayRuleType};

use super::{ComponentResult, PerDiemRule, display, round_money};

/// Calculates per diem as duty hours times the hourly allowance.
///
/// Nothing is paid when duty hours fall below the rule's minimum; the line
/// is still reported with a "below minimum" description.
///
/// # Arguments
///
/// * `context` - The aggregated period context
/// * `rule` - The resolved per diem rule
/// * `step_number` - The audit step number to assign
pub fn calculate_per_diem(
    context: &PayContext,
    rule: &PerDiemRule,
    step_number: u32,
) -> ComponentResult {
    let duty_hours = context.duty_hours;
    let eligible = duty_hours >= rule.minimum_duty_hours;

    let (amount, description) = if eligible {
        let amount = round_money(duty_hours * rule.hourly_rate);
        (
            amount,
            format!(
                "{}h duty time at ${}/h",
                display(duty_hours),
                display(rule.hourly_rate)
            ),
        )
    } else {
        (
            round_money(Decimal::ZERO),
            format!(
                "{}h duty time is below the {}h minimum",
                display(duty_hours),
                display(rule.minimum_duty_hours)
            ),
        )
    };

    ComponentResult {
        component: PayComponent {
            component_type: PayRuleType::PerDiem,
            name: "Per Diem".to_string(),
            hours: duty_hours,
            rate: rule.hourly_rate,
            amount,
            description: description.clone(),
            rule_id: Some(rule.rule_id.clone()),
        },
        audit_step: AuditStep {
            step_number,
            rule_id: rule.rule_id.clone(),
            rule_name: "Per Diem".to_string(),
            input: serde_json::json!({
                "duty_hours": duty_hours.to_string(),
                "hourly_rate": rule.hourly_rate.to_string(),
                "minimum_duty_hours": rule.minimum_duty_hours.to_string()
            }),
            output: serde_json::json!({
                "eligible": eligible,
                "amount": amount.to_string()
            }),
            reasoning: format!("{description} = ${amount}"),
        },
        warning: None,
    }
}
