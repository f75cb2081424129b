//! Flight duty period limit check.

use crate::config::RuleSet;
use crate::models::{FdpLimitCheck, ProposedDutyAssignment, ReportTimeBucket, SegmentBucket};

/// Checks the proposed flight duty period against the FDP table.
///
/// The start hour selects the report-time bucket and the segment count the
/// segment bucket. When the table has no cell for the pair, the rule set's
/// default maximum applies and `table_match` is false.
///
/// Exceeding the maximum is a violation; equalling it is not.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::legality::check_fdp_limits;
/// use crew_rules_engine::config::RuleSetLoader;
/// use crew_rules_engine::models::{ProposedDutyAssignment, ReportTimeBucket, SegmentBucket};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let rule_set = RuleSetLoader::load("./config/default").unwrap();
/// let proposed = ProposedDutyAssignment {
///     aircraft_type: "B737".to_string(),
///     start_time: Utc.with_ymd_and_hms(2025, 3, 10, 6, 30, 0).unwrap(),
///     end_time: None,
///     estimated_flight_minutes: Some(600),
///     segment_count: 2,
/// };
///
/// let check = check_fdp_limits(&proposed, &rule_set);
/// assert_eq!(check.report_time_bucket, ReportTimeBucket::H0600To0659);
/// assert_eq!(check.segment_bucket, SegmentBucket::Two);
/// assert_eq!(check.max_fdp_hours, Decimal::from(13));
/// assert!(check.is_compliant);
/// ```
pub fn check_fdp_limits(proposed: &ProposedDutyAssignment, rule_set: &RuleSet) -> FdpLimitCheck {
    let report_time_bucket = ReportTimeBucket::from_hour(proposed.start_hour());
    let segment_bucket = SegmentBucket::from_count(proposed.segment_count);

    let table_cell = rule_set.fdp_table_cell(segment_bucket, report_time_bucket);
    let max_fdp_hours = rule_set.max_fdp_hours(segment_bucket, report_time_bucket);
    let proposed_fdp_hours = proposed.fdp_hours();
    let is_compliant = proposed_fdp_hours <= max_fdp_hours;

    let violations = if is_compliant {
        Vec::new()
    } else {
        vec![format!(
            "Proposed FDP of {}h exceeds the {}h maximum for {} segment(s) reporting at {:02}:00",
            proposed_fdp_hours.round_dp(2).normalize(),
            max_fdp_hours.normalize(),
            proposed.segment_count,
            proposed.start_hour()
        )]
    };

    FdpLimitCheck {
        is_compliant,
        proposed_fdp_hours,
        max_fdp_hours,
        segment_bucket,
        report_time_bucket,
        table_match: table_cell.is_some(),
        violations,
    }
}
