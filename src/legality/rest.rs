//! Minimum rest check.
//!
//! Rest is measured from the release of the most recent duty that reported
//! before the proposed start, and the requirement is tiered on that duty's
//! flight duty period.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::config::RuleSet;
use crate::models::{DutyTimeRecord, RestCompliance};
use crate::rolling::minutes_to_hours;

// TODO: the 30-consecutive-hours-of-rest-in-168-hours requirement needs
// product confirmation of its look-back anchor before it can be enforced.

/// Checks whether the crew member has rested enough before `proposed_start`.
///
/// # Arguments
///
/// * `history` - Duty records of the crew member, in any order
/// * `proposed_start` - Proposed report time
/// * `rule_set` - Supplies the rest tiers
///
/// # Returns
///
/// A [`RestCompliance`]:
/// - No earlier duty: compliant, `hours_since_rest` is `None`.
/// - Earlier duty without end time: non-compliant against the missing-end
///   requirement, with a "no end time recorded" violation.
/// - Otherwise compliant iff the hours since release are at least the tier
///   requirement for the previous FDP.
///
/// The previous duty is the one with the latest report time before
/// `proposed_start`, not the latest release. A previous duty still running at
/// `proposed_start` therefore yields a negative `hours_since_rest` and fails.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::legality::check_rest;
/// use crew_rules_engine::config::RuleSetLoader;
/// use chrono::{TimeZone, Utc};
///
/// let rule_set = RuleSetLoader::load("./config/default").unwrap();
/// let proposed = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
///
/// let rest = check_rest(&[], proposed, &rule_set);
/// assert!(rest.is_compliant);
/// assert!(rest.hours_since_rest.is_none());
/// ```
pub fn check_rest(
    history: &[DutyTimeRecord],
    proposed_start: DateTime<Utc>,
    rule_set: &RuleSet,
) -> RestCompliance {
    let previous = history
        .iter()
        .filter(|r| r.start_time < proposed_start)
        .max_by_key(|r| r.start_time);

    let Some(previous) = previous else {
        return RestCompliance {
            is_compliant: true,
            hours_since_rest: None,
            required_rest_hours: Decimal::ZERO,
            previous_duty_id: None,
            previous_fdp_hours: None,
            violations: Vec::new(),
        };
    };

    let (Some(end_time), Some(previous_fdp)) = (previous.end_time, previous.fdp_hours()) else {
        return RestCompliance {
            is_compliant: false,
            hours_since_rest: None,
            required_rest_hours: rule_set.missing_end_time_rest_hours(),
            previous_duty_id: Some(previous.id.clone()),
            previous_fdp_hours: None,
            violations: vec![format!(
                "Previous duty {} has no end time recorded; rest cannot be verified",
                previous.id
            )],
        };
    };

    let elapsed = minutes_to_hours((proposed_start - end_time).num_minutes());
    let required = rule_set.required_rest_hours(previous_fdp);
    let is_compliant = elapsed >= required;

    let violations = if is_compliant {
        Vec::new()
    } else {
        vec![format!(
            "Insufficient rest: {}h since previous duty, {}h required after a {}h FDP",
            elapsed.round_dp(2).normalize(),
            required.normalize(),
            previous_fdp.round_dp(2).normalize()
        )]
    };

    RestCompliance {
        is_compliant,
        hours_since_rest: Some(elapsed),
        required_rest_hours: required,
        previous_duty_id: Some(previous.id.clone()),
        previous_fdp_hours: Some(previous_fdp),
        violations,
    }
}
