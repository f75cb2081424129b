//! Scheduler-facing recommendations derived from the check results.

use rust_decimal::Decimal;

use crate::config::RuleSet;
use crate::models::{
    DutyLimitCheck, QualificationIssue, QualificationIssueType, RestCompliance,
};

/// Message used when nothing needs attention.
pub const ALL_CHECKS_PASSED: &str = "Assignment meets all legality checks";

/// Builds one recommendation per unmet condition, in a fixed order:
/// qualifications, rest, FDP, 28-day, 365-day. Windows at or above the
/// approaching threshold but within their ceiling get a warning line.
///
/// Output depends only on the inputs.
pub fn build_recommendations(
    issues: &[QualificationIssue],
    rest: &RestCompliance,
    duty_limits: &DutyLimitCheck,
    rule_set: &RuleSet,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    for issue in issues {
        let line = match issue.issue_type {
            QualificationIssueType::TypeRating => format!(
                "{}: restore type currency or assign a crew member current on type",
                issue.description
            ),
            QualificationIssueType::Medical => {
                format!("{}: renew the medical certificate before assignment", issue.description)
            }
            QualificationIssueType::Training => {
                format!("{}: complete overdue training before assignment", issue.description)
            }
        };
        recommendations.push(line);
    }

    if !rest.is_compliant {
        match (&rest.previous_duty_id, rest.hours_since_rest) {
            (Some(duty_id), None) => recommendations.push(format!(
                "Record the release time of duty {duty_id}; {}h of rest applies until it is confirmed",
                hours(rest.required_rest_hours)
            )),
            _ => recommendations.push(format!(
                "Delay report by at least {}h to meet the {}h minimum rest",
                hours(rest.hours_short()),
                hours(rest.required_rest_hours)
            )),
        }
    }

    let fdp = &duty_limits.fdp;
    if !fdp.is_compliant {
        recommendations.push(format!(
            "Reduce the flight duty period by {}h to the {}h maximum for the {} report window",
            hours(fdp.proposed_fdp_hours - fdp.max_fdp_hours),
            hours(fdp.max_fdp_hours),
            fdp.report_time_bucket.label()
        ));
    }

    let rolling = &duty_limits.rolling;
    let approaching_percent = rule_set.regulatory().alert_thresholds.approaching_percent;
    for (label, projected, limit, compliant) in [
        (
            "28-day",
            rolling.projected_28_days,
            rolling.limit_28_days,
            rolling.is_compliant_28_days,
        ),
        (
            "365-day",
            rolling.projected_365_days,
            rolling.limit_365_days,
            rolling.is_compliant_365_days,
        ),
    ] {
        if !compliant {
            recommendations.push(format!(
                "Reduce flight time by {}h: projected {label} total of {}h exceeds the {}h limit",
                hours(projected - limit),
                hours(projected),
                hours(limit)
            ));
        } else if projected * Decimal::ONE_HUNDRED >= limit * approaching_percent {
            recommendations.push(format!(
                "Approaching {label} limit: projected {}h is {}% of the {}h limit",
                hours(projected),
                hours(projected * Decimal::ONE_HUNDRED / limit),
                hours(limit)
            ));
        }
    }

    if recommendations.is_empty() {
        recommendations.push(ALL_CHECKS_PASSED.to_string());
    }

    recommendations
}

fn hours(value: Decimal) -> Decimal {
    value.round_dp(2).normalize()
}
