//! Monthly guarantee top-up.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AuditStep, AuditWarning, PayComponent, PayContext, PayRuleType};

use super::{ComponentResult, GuaranteeRule, display, round_money};

/// Tops base pay up to the monthly guarantee for the crew member's position.
///
/// The top-up is `max(0, guarantee - base_pay)`; only base pay counts toward
/// the guarantee.
///
/// # Arguments
///
/// * `context` - The aggregated period context
/// * `rule` - The guarantee for the position; `None` pays nothing and warns
/// * `base_pay` - The already computed base pay amount
/// * `step_number` - The audit step number to assign
///
/// # Examples
///
/// A captain with $16,000 base pay against an $18,750 guarantee receives a
/// $2,750 top-up; with $20,000 base pay the top-up is zero.
pub fn calculate_guarantee(
    context: &PayContext,
    rule: Option<&GuaranteeRule>,
    base_pay: Decimal,
    step_number: u32,
) -> ComponentResult {
    let Some(rule) = rule else {
        warn!(
            crew_id = %context.crew.id,
            position = %context.crew.position,
            "No monthly guarantee configured"
        );
        let description = format!("No monthly guarantee configured for {}", context.crew.position);
        return ComponentResult {
            component: PayComponent::zero(PayRuleType::Guarantee, "Guarantee", description.clone()),
            audit_step: AuditStep {
                step_number,
                rule_id: "guarantee".to_string(),
                rule_name: "Monthly Guarantee".to_string(),
                input: serde_json::json!({
                    "position": context.crew.position,
                    "base_pay": base_pay.to_string()
                }),
                output: serde_json::json!({ "amount": "0" }),
                reasoning: description.clone(),
            },
            warning: Some(AuditWarning::new("NO_GUARANTEE", description, "low")),
        };
    };

    let amount = round_money((rule.guaranteed_amount - base_pay).max(Decimal::ZERO));
    let description = if amount.is_zero() {
        format!(
            "Base pay ${} meets the ${} guarantee",
            display(base_pay),
            display(rule.guaranteed_amount)
        )
    } else {
        format!(
            "Top-up from base pay ${} to the ${} guarantee",
            display(base_pay),
            display(rule.guaranteed_amount)
        )
    };

    ComponentResult {
        component: PayComponent {
            component_type: PayRuleType::Guarantee,
            name: "Guarantee".to_string(),
            hours: Decimal::ZERO,
            rate: rule.guaranteed_amount,
            amount,
            description: description.clone(),
            rule_id: Some(rule.rule_id.clone()),
        },
        audit_step: AuditStep {
            step_number,
            rule_id: rule.rule_id.clone(),
            rule_name: "Monthly Guarantee".to_string(),
            input: serde_json::json!({
                "guaranteed_amount": rule.guaranteed_amount.to_string(),
                "base_pay": base_pay.to_string()
            }),
            output: serde_json::json!({ "amount": amount.to_string() }),
            reasoning: format!("{description} = ${amount}"),
        },
        warning: None,
    }
}
