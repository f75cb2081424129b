//! Monthly overtime.

use rust_decimal::Decimal;

use crate::models::{AuditStep, PayComponent, PayContext, PayRuleType};

use super::{ComponentResult, OvertimeRule, display, round_money};

/// Calculates overtime on flight hours above the monthly threshold.
///
/// Base pay already covers every flight hour at 1x, so overtime pays the
/// excess hours at the base rate times `multiplier - 1`.
///
/// # Arguments
///
/// * `context` - The aggregated period context
/// * `rule` - The overtime rule; `None` pays nothing
/// * `base_rate` - The crew member's base hourly rate
/// * `step_number` - The audit step number to assign
pub fn calculate_overtime(
    context: &PayContext,
    rule: Option<&OvertimeRule>,
    base_rate: Decimal,
    step_number: u32,
) -> ComponentResult {
    let Some(rule) = rule else {
        let description = "No overtime rule configured";
        return ComponentResult {
            component: PayComponent::zero(PayRuleType::Overtime, "Overtime", description),
            audit_step: AuditStep {
                step_number,
                rule_id: "overtime".to_string(),
                rule_name: "Overtime".to_string(),
                input: serde_json::json!({
                    "flight_hours": context.flight_hours.to_string()
                }),
                output: serde_json::json!({ "amount": "0" }),
                reasoning: description.to_string(),
            },
            warning: None,
        };
    };

    let overtime_hours = (context.flight_hours - rule.monthly_threshold_hours).max(Decimal::ZERO);
    let premium_rate = base_rate * (rule.multiplier - Decimal::ONE);
    let amount = round_money(overtime_hours * premium_rate);

    let description = if overtime_hours.is_zero() {
        format!(
            "{}h flight time is within the {}h monthly threshold",
            display(context.flight_hours),
            display(rule.monthly_threshold_hours)
        )
    } else {
        format!(
            "{}h above the {}h threshold at ${}/h ({}x)",
            display(overtime_hours),
            display(rule.monthly_threshold_hours),
            display(premium_rate),
            display(rule.multiplier)
        )
    };

    ComponentResult {
        component: PayComponent {
            component_type: PayRuleType::Overtime,
            name: "Overtime".to_string(),
            hours: overtime_hours,
            rate: premium_rate,
            amount,
            description: description.clone(),
            rule_id: Some(rule.rule_id.clone()),
        },
        audit_step: AuditStep {
            step_number,
            rule_id: rule.rule_id.clone(),
            rule_name: "Overtime".to_string(),
            input: serde_json::json!({
                "flight_hours": context.flight_hours.to_string(),
                "monthly_threshold_hours": rule.monthly_threshold_hours.to_string(),
                "multiplier": rule.multiplier.to_string(),
                "base_rate": base_rate.to_string()
            }),
            output: serde_json::json!({
                "overtime_hours": overtime_hours.to_string(),
                "amount": amount.to_string()
            }),
            reasoning: format!("{description} = ${amount}"),
        },
        warning: None,
    }
}
