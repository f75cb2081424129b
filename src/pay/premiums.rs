//! Premium pay.
//!
//! Premiums stack: each kind is evaluated independently and contributes its
//! own line when it has both a rule and a non-zero input. A premium that
//! does not apply produces no line and no audit step.

use rust_decimal::Decimal;

use crate::models::{AuditStep, PayComponent, PayContext, PayRuleType};

use super::{ComponentResult, FlatRule, LongevityRule, MultiplierRule, display, round_money};

/// Night hours credited per circadian-low duty are capped at this many
/// minutes.
pub const NIGHT_HOURS_CAP_PER_DUTY_MINUTES: i64 = 240;

fn multiplier_premium(
    name: &str,
    hours: Decimal,
    rule: &MultiplierRule,
    base_rate: Decimal,
    step_number: u32,
) -> ComponentResult {
    let premium_rate = base_rate * (rule.multiplier - Decimal::ONE);
    let amount = round_money(hours * premium_rate);
    let description = format!(
        "{}h at ${}/h ({}x of ${}/h base)",
        display(hours),
        display(premium_rate),
        display(rule.multiplier),
        display(base_rate)
    );

    ComponentResult {
        component: PayComponent {
            component_type: PayRuleType::Premium,
            name: name.to_string(),
            hours,
            rate: premium_rate,
            amount,
            description: description.clone(),
            rule_id: Some(rule.rule_id.clone()),
        },
        audit_step: AuditStep {
            step_number,
            rule_id: rule.rule_id.clone(),
            rule_name: name.to_string(),
            input: serde_json::json!({
                "hours": hours.to_string(),
                "base_rate": base_rate.to_string(),
                "multiplier": rule.multiplier.to_string()
            }),
            output: serde_json::json!({ "amount": amount.to_string() }),
            reasoning: format!("{description} = ${amount}"),
        },
        warning: None,
    }
}

/// Night premium: `night_hours * base_rate * (multiplier - 1)`.
///
/// `rule` is already filtered for the crew member's category, so `None`
/// also covers a night rule that does not apply to them.
pub fn calculate_night_premium(
    context: &PayContext,
    rule: Option<&MultiplierRule>,
    base_rate: Decimal,
    step_number: u32,
) -> Option<ComponentResult> {
    let rule = rule?;
    if context.night_hours.is_zero() {
        return None;
    }
    Some(multiplier_premium(
        "Night Premium",
        context.night_hours,
        rule,
        base_rate,
        step_number,
    ))
}

/// Holiday premium: `holiday_hours * base_rate * (multiplier - 1)`.
pub fn calculate_holiday_premium(
    context: &PayContext,
    rule: Option<&MultiplierRule>,
    base_rate: Decimal,
    step_number: u32,
) -> Option<ComponentResult> {
    let rule = rule?;
    if context.holiday_hours.is_zero() {
        return None;
    }
    Some(multiplier_premium(
        "Holiday Premium",
        context.holiday_hours,
        rule,
        base_rate,
        step_number,
    ))
}

/// International premium: a flat amount per international trip.
pub fn calculate_international_premium(
    context: &PayContext,
    rule: Option<&FlatRule>,
    step_number: u32,
) -> Option<ComponentResult> {
    let rule = rule?;
    if context.international_trips == 0 {
        return None;
    }

    let trips = Decimal::from(context.international_trips);
    let amount = round_money(trips * rule.flat_amount);
    let description = format!(
        "{} international trip(s) at ${} each",
        context.international_trips,
        display(rule.flat_amount)
    );

    Some(ComponentResult {
        component: PayComponent {
            component_type: PayRuleType::Premium,
            name: "International Premium".to_string(),
            hours: trips,
            rate: rule.flat_amount,
            amount,
            description: description.clone(),
            rule_id: Some(rule.rule_id.clone()),
        },
        audit_step: AuditStep {
            step_number,
            rule_id: rule.rule_id.clone(),
            rule_name: "International Premium".to_string(),
            input: serde_json::json!({
                "international_trips": context.international_trips,
                "flat_amount": rule.flat_amount.to_string()
            }),
            output: serde_json::json!({ "amount": amount.to_string() }),
            reasoning: format!("{description} = ${amount}"),
        },
        warning: None,
    })
}

/// Longevity premium: a percentage of base pay chosen by years of service.
///
/// Crew members outside every tier, or with no base pay, receive nothing.
pub fn calculate_longevity_premium(
    context: &PayContext,
    rule: Option<&LongevityRule>,
    base_pay: Decimal,
    step_number: u32,
) -> Option<ComponentResult> {
    let rule = rule?;
    if base_pay.is_zero() {
        return None;
    }
    let tier = rule.tier_for(context.years_of_service)?;
    if tier.percentage.is_zero() {
        return None;
    }

    let amount = round_money(base_pay * tier.percentage / Decimal::ONE_HUNDRED);
    let tier_label = match tier.max_years {
        Some(max) => format!("{}-{} years", tier.min_years, max),
        None => format!("{}+ years", tier.min_years),
    };
    let description = format!(
        "{}% of ${} base pay for {} years of service ({tier_label} tier)",
        display(tier.percentage),
        display(base_pay),
        context.years_of_service
    );

    Some(ComponentResult {
        component: PayComponent {
            component_type: PayRuleType::Premium,
            name: "Longevity Premium".to_string(),
            hours: Decimal::ZERO,
            rate: tier.percentage,
            amount,
            description: description.clone(),
            rule_id: Some(rule.rule_id.clone()),
        },
        audit_step: AuditStep {
            step_number,
            rule_id: rule.rule_id.clone(),
            rule_name: "Longevity Premium".to_string(),
            input: serde_json::json!({
                "years_of_service": context.years_of_service,
                "base_pay": base_pay.to_string()
            }),
            output: serde_json::json!({
                "tier": tier_label,
                "percentage": tier.percentage.to_string(),
                "amount": amount.to_string()
            }),
            reasoning: format!("{description} = ${amount}"),
        },
        warning: None,
    })
}
