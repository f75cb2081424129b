//! Graded rolling-window alerts.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::RuleSet;
use crate::models::{AlertType, ComplianceAlert, RollingWindow, Severity};
use crate::rolling::RollingHours;

/// Grades one window's total against its ceiling.
///
/// Reaching the ceiling is CRITICAL `LIMIT_EXCEEDED`; reaching the high
/// threshold is HIGH `APPROACHING_LIMIT`; reaching the approaching
/// threshold is MEDIUM `APPROACHING_LIMIT`. Below that, no alert.
pub fn grade_window(
    crew_id: &str,
    window: RollingWindow,
    current: Decimal,
    limit: Decimal,
    rule_set: &RuleSet,
) -> Option<ComplianceAlert> {
    let thresholds = &rule_set.regulatory().alert_thresholds;
    let label = window_label(window);
    let scaled = current * Decimal::ONE_HUNDRED;
    let remaining = (limit - current).max(Decimal::ZERO);

    let (alert_type, severity, recommended_action) = if current >= limit {
        (
            AlertType::LimitExceeded,
            Severity::Critical,
            format!("Remove from flight duty until the {label} total falls below {}h", fmt(limit)),
        )
    } else if scaled >= limit * thresholds.high_percent {
        (
            AlertType::ApproachingLimit,
            Severity::High,
            format!("Restrict assignments to at most {}h of flight time", fmt(remaining)),
        )
    } else if scaled >= limit * thresholds.approaching_percent {
        (
            AlertType::ApproachingLimit,
            Severity::Medium,
            format!(
                "Review upcoming assignments; {}h remain before the {label} limit",
                fmt(remaining)
            ),
        )
    } else {
        return None;
    };

    let message = match alert_type {
        AlertType::LimitExceeded => format!(
            "{label} flight time of {}h has reached the {}h limit",
            fmt(current),
            fmt(limit)
        ),
        _ => format!(
            "{label} flight time of {}h is at {}% of the {}h limit",
            fmt(current),
            fmt(scaled / limit),
            fmt(limit)
        ),
    };

    Some(ComplianceAlert {
        alert_id: Uuid::new_v4(),
        crew_id: crew_id.to_string(),
        alert_type,
        severity,
        window,
        current_value: current,
        limit_value: limit,
        message,
        recommended_action,
    })
}

/// Grades both windows independently; returns zero, one or two alerts,
/// 28-day first.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::compliance::grade_alerts;
/// use crew_rules_engine::config::RuleSetLoader;
/// use crew_rules_engine::models::{AlertType, Severity};
/// use crew_rules_engine::rolling::RollingHours;
/// use rust_decimal::Decimal;
///
/// let rule_set = RuleSetLoader::load("./config/default").unwrap();
/// let hours = RollingHours {
///     hours_28_days: Decimal::from(100),
///     hours_365_days: Decimal::from(500),
/// };
///
/// let alerts = grade_alerts("crew_001", hours, &rule_set);
/// assert_eq!(alerts.len(), 1);
/// assert_eq!(alerts[0].alert_type, AlertType::LimitExceeded);
/// assert_eq!(alerts[0].severity, Severity::Critical);
/// ```
pub fn grade_alerts(crew_id: &str, hours: RollingHours, rule_set: &RuleSet) -> Vec<ComplianceAlert> {
    [
        grade_window(
            crew_id,
            RollingWindow::Days28,
            hours.hours_28_days,
            rule_set.limit_28_days(),
            rule_set,
        ),
        grade_window(
            crew_id,
            RollingWindow::Days365,
            hours.hours_365_days,
            rule_set.limit_365_days(),
            rule_set,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn window_label(window: RollingWindow) -> &'static str {
    match window {
        RollingWindow::Days28 => "28-day",
        RollingWindow::Days365 => "365-day",
    }
}

fn fmt(value: Decimal) -> Decimal {
    value.round_dp(2).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_rule_set;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn grade_28(current: &str) -> Option<ComplianceAlert> {
        let rule_set = default_rule_set();
        grade_window(
            "crew_001",
            RollingWindow::Days28,
            dec(current),
            dec("100"),
            &rule_set,
        )
    }

    #[test]
    fn test_below_ninety_percent_no_alert() {
        assert!(grade_28("89.99").is_none());
    }

    #[test]
    fn test_ninety_percent_is_medium() {
        let alert = grade_28("90").unwrap();
        assert_eq!(alert.alert_type, AlertType::ApproachingLimit);
        assert_eq!(alert.severity, Severity::Medium);
        assert!(alert.message.contains("90%"));
        assert!(alert.recommended_action.contains("10h remain"));
    }

    #[test]
    fn test_ninety_five_percent_is_high() {
        let alert = grade_28("97.5").unwrap();
        assert_eq!(alert.severity, Severity::High);
        assert!(alert.recommended_action.contains("2.5h"));
    }

    #[test]
    fn test_at_limit_is_critical() {
        let alert = grade_28("100").unwrap();
        assert_eq!(alert.alert_type, AlertType::LimitExceeded);
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.limit_value, dec("100"));
    }

    #[test]
    fn test_both_windows_alert_independently() {
        let rule_set = default_rule_set();
        let hours = RollingHours {
            hours_28_days: dec("92"),
            hours_365_days: dec("960"),
        };

        let alerts = grade_alerts("crew_001", hours, &rule_set);

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].window, RollingWindow::Days28);
        assert_eq!(alerts[0].severity, Severity::Medium);
        assert_eq!(alerts[1].window, RollingWindow::Days365);
        assert_eq!(alerts[1].severity, Severity::High);
        assert_ne!(alerts[0].alert_id, alerts[1].alert_id);
    }
}
