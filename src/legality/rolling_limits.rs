//! Cumulative flight-time limit check.

use rust_decimal::Decimal;

use crate::config::RuleSet;
use crate::models::RollingLimitCheck;
use crate::rolling::RollingHours;

/// Projects the proposed flight hours onto both rolling windows and checks
/// them against the ceilings.
///
/// A projection equal to its ceiling is compliant; only strictly exceeding
/// it is a violation.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::legality::check_rolling_limits;
/// use crew_rules_engine::config::RuleSetLoader;
/// use crew_rules_engine::rolling::RollingHours;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rule_set = RuleSetLoader::load("./config/default").unwrap();
/// let history = RollingHours {
///     hours_28_days: Decimal::from_str("95.5").unwrap(),
///     hours_365_days: Decimal::from(600),
/// };
///
/// let check = check_rolling_limits(history, Decimal::from(10), &rule_set);
/// assert_eq!(check.projected_28_days, Decimal::from_str("105.5").unwrap());
/// assert!(!check.is_compliant_28_days);
/// assert!(check.is_compliant_365_days);
/// ```
pub fn check_rolling_limits(
    history: RollingHours,
    proposed_flight_hours: Decimal,
    rule_set: &RuleSet,
) -> RollingLimitCheck {
    let projected = history.projected(proposed_flight_hours);
    let limit_28_days = rule_set.limit_28_days();
    let limit_365_days = rule_set.limit_365_days();

    let is_compliant_28_days = projected.hours_28_days <= limit_28_days;
    let is_compliant_365_days = projected.hours_365_days <= limit_365_days;

    let mut violations = Vec::new();
    if !is_compliant_28_days {
        violations.push(format!(
            "Projected 28-day flight time {}h exceeds the {}h limit",
            projected.hours_28_days.round_dp(2).normalize(),
            limit_28_days.normalize()
        ));
    }
    if !is_compliant_365_days {
        violations.push(format!(
            "Projected 365-day flight time {}h exceeds the {}h limit",
            projected.hours_365_days.round_dp(2).normalize(),
            limit_365_days.normalize()
        ));
    }

    RollingLimitCheck {
        hours_28_days: history.hours_28_days,
        hours_365_days: history.hours_365_days,
        proposed_flight_hours,
        projected_28_days: projected.hours_28_days,
        projected_365_days: projected.hours_365_days,
        limit_28_days,
        limit_365_days,
        is_compliant_28_days,
        is_compliant_365_days,
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_rule_set;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn history(h28: &str, h365: &str) -> RollingHours {
        RollingHours {
            hours_28_days: dec(h28),
            hours_365_days: dec(h365),
        }
    }

    #[test]
    fn test_projection_exactly_at_limit_is_compliant() {
        let rule_set = default_rule_set();
        let check = check_rolling_limits(history("94", "994"), dec("6"), &rule_set);

        assert_eq!(check.projected_28_days, dec("100"));
        assert_eq!(check.projected_365_days, dec("1000"));
        assert!(check.is_compliant());
        assert!(check.violations.is_empty());
    }

    #[test]
    fn test_both_windows_exceeded() {
        let rule_set = default_rule_set();
        let check = check_rolling_limits(history("99", "998"), dec("2.5"), &rule_set);

        assert!(!check.is_compliant_28_days);
        assert!(!check.is_compliant_365_days);
        assert_eq!(check.violations.len(), 2);
        assert!(check.violations[0].contains("101.5h"));
        assert!(check.violations[1].contains("1000.5h"));
    }
}
