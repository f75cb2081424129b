//! Runs every pay component over one context.

use rust_decimal::Decimal;

use crate::models::{AuditTrace, PayBreakdown, PayComponent, PayContext};

use super::{
    ComponentResult, ResolvedPayRules, calculate_base_pay, calculate_guarantee,
    calculate_holiday_premium, calculate_international_premium, calculate_longevity_premium,
    calculate_night_premium, calculate_overtime, calculate_per_diem,
};

/// The breakdown and the audit trail that produced it.
#[derive(Debug, Clone)]
pub struct PayEvaluation {
    pub breakdown: PayBreakdown,
    pub audit_trace: AuditTrace,
}

impl PayEvaluation {
    /// Sum of every component amount.
    pub fn total(&self) -> Decimal {
        self.breakdown.total()
    }
}

#[derive(Default)]
struct TraceBuilder {
    trace: AuditTrace,
}

impl TraceBuilder {
    fn next_step(&self) -> u32 {
        self.trace.steps.len() as u32 + 1
    }

    fn record(&mut self, result: ComponentResult) -> PayComponent {
        self.trace.steps.push(result.audit_step);
        if let Some(warning) = result.warning {
            self.trace.warnings.push(warning);
        }
        result.component
    }
}

/// Evaluates all components in a fixed order: base pay, per diem, night,
/// holiday, international and longevity premiums, overtime, guarantee.
///
/// Every component amount is rounded to cents before it is summed, so the
/// breakdown total equals the sum of its lines exactly.
pub fn evaluate_pay(context: &PayContext, rules: &ResolvedPayRules) -> PayEvaluation {
    let mut trace = TraceBuilder::default();
    let base_rate = rules.base_hourly_rate();

    let base_pay = trace.record(calculate_base_pay(context, rules.base.as_ref(), trace.next_step()));
    let per_diem = trace.record(calculate_per_diem(context, &rules.per_diem, trace.next_step()));

    let mut premiums = Vec::new();
    if let Some(result) =
        calculate_night_premium(context, rules.night.as_ref(), base_rate, trace.next_step())
    {
        premiums.push(trace.record(result));
    }
    if let Some(result) =
        calculate_holiday_premium(context, rules.holiday.as_ref(), base_rate, trace.next_step())
    {
        premiums.push(trace.record(result));
    }
    if let Some(result) =
        calculate_international_premium(context, rules.international.as_ref(), trace.next_step())
    {
        premiums.push(trace.record(result));
    }
    if let Some(result) = calculate_longevity_premium(
        context,
        rules.longevity.as_ref(),
        base_pay.amount,
        trace.next_step(),
    ) {
        premiums.push(trace.record(result));
    }

    let overtime = trace.record(calculate_overtime(
        context,
        rules.overtime.as_ref(),
        base_rate,
        trace.next_step(),
    ));
    let guarantee = trace.record(calculate_guarantee(
        context,
        rules.guarantee.as_ref(),
        base_pay.amount,
        trace.next_step(),
    ));

    PayEvaluation {
        breakdown: PayBreakdown {
            base_pay,
            per_diem,
            premiums,
            overtime,
            guarantee,
        },
        audit_trace: trace.trace,
    }
}
