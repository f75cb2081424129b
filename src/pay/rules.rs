//! Pay rule resolution.
//!
//! Each pay component is driven by exactly one rule, except premiums, where
//! one rule per premium kind applies and the kinds stack. Dynamic rules from
//! the store win over the static pay table when they apply to the crew
//! member and period; among dynamic rules the most recently effective one
//! wins. A dynamic rule whose parameters cannot be read is reported as a
//! warning and the static value is used instead.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::{LongevityTier, MultiplierPremium, RuleSet};
use crate::models::{AuditWarning, CrewMember, PayRuleDefinition, PayRuleType};

/// Hourly flight pay rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRateRule {
    pub rule_id: String,
    pub hourly_rate: Decimal,
}

/// Per diem rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerDiemRule {
    pub rule_id: String,
    pub hourly_rate: Decimal,
    pub minimum_duty_hours: Decimal,
}

/// A premium paid as a share of the base rate above 1x.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiplierRule {
    pub rule_id: String,
    pub multiplier: Decimal,
}

/// A premium paid as a flat amount per trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRule {
    pub rule_id: String,
    pub flat_amount: Decimal,
}

/// Longevity premium tiers.
#[derive(Debug, Clone)]
pub struct LongevityRule {
    pub rule_id: String,
    pub tiers: Vec<LongevityTier>,
}

impl LongevityRule {
    /// The tier containing `years_of_service`.
    pub fn tier_for(&self, years_of_service: u32) -> Option<&LongevityTier> {
        self.tiers.iter().find(|t| t.contains(years_of_service))
    }
}

/// Monthly overtime rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvertimeRule {
    pub rule_id: String,
    pub monthly_threshold_hours: Decimal,
    pub multiplier: Decimal,
}

/// Monthly guarantee rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuaranteeRule {
    pub rule_id: String,
    pub guaranteed_amount: Decimal,
}

/// The single rule (or none) that drives each component for one crew
/// member and period.
#[derive(Debug, Clone)]
pub struct ResolvedPayRules {
    pub base: Option<BaseRateRule>,
    pub per_diem: PerDiemRule,
    /// Night premium; `None` when absent or not applicable to the category.
    pub night: Option<MultiplierRule>,
    pub holiday: Option<MultiplierRule>,
    pub international: Option<FlatRule>,
    pub longevity: Option<LongevityRule>,
    pub overtime: Option<OvertimeRule>,
    pub guarantee: Option<GuaranteeRule>,
}

impl ResolvedPayRules {
    /// The base hourly rate premiums and overtime are computed from; zero
    /// when no base rate exists.
    pub fn base_hourly_rate(&self) -> Decimal {
        self.base
            .as_ref()
            .map(|b| b.hourly_rate)
            .unwrap_or(Decimal::ZERO)
    }
}

// ============================================================================
// Dynamic rule parameter bundles
// ============================================================================

#[derive(Debug, Deserialize)]
struct BasePayParams {
    hourly_rate: Decimal,
}

#[derive(Debug, Deserialize)]
struct PerDiemParams {
    hourly_rate: Decimal,
    #[serde(default)]
    minimum_duty_hours: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct OvertimeParams {
    monthly_threshold_hours: Decimal,
    multiplier: Decimal,
}

#[derive(Debug, Deserialize)]
struct GuaranteeParams {
    guaranteed_amount: Decimal,
}

/// Premium parameters, discriminated by `premium_type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "premium_type", rename_all = "snake_case")]
enum PremiumParams {
    Night {
        multiplier: Decimal,
        #[serde(default)]
        applies_to: Vec<String>,
    },
    Holiday {
        multiplier: Decimal,
    },
    International {
        flat_amount: Decimal,
    },
    Longevity {
        tiers: Vec<LongevityTier>,
    },
}

/// Dynamic rules that apply, most recently effective first.
fn applicable_rules<'a>(
    crew: &CrewMember,
    period_start: NaiveDate,
    dynamic: &'a [PayRuleDefinition],
) -> Vec<&'a PayRuleDefinition> {
    let mut rules: Vec<&PayRuleDefinition> = dynamic
        .iter()
        .filter(|r| r.applies_to(crew.category, &crew.position, period_start))
        .collect();
    rules.sort_by(|a, b| b.effective_date.cmp(&a.effective_date));
    rules
}

/// Reads the parameters of the winning rule of `rule_type`.
///
/// `None` when no dynamic rule of the type applies or its parameters are
/// unusable; the latter also pushes a warning.
fn winning_params<T: DeserializeOwned>(
    rules: &[&PayRuleDefinition],
    rule_type: PayRuleType,
    warnings: &mut Vec<AuditWarning>,
) -> Option<(String, T)> {
    let rule = rules.iter().find(|r| r.rule_type == rule_type)?;
    parse_params(rule, warnings).map(|params| (rule.rule_id.clone(), params))
}

fn parse_params<T: DeserializeOwned>(
    rule: &PayRuleDefinition,
    warnings: &mut Vec<AuditWarning>,
) -> Option<T> {
    match serde_json::from_value::<T>(rule.parameters.clone()) {
        Ok(params) => Some(params),
        Err(e) => {
            warn!(
                rule_id = %rule.rule_id,
                rule_type = %rule.rule_type,
                error = %e,
                "Unusable pay rule parameters; falling back to static rule"
            );
            warnings.push(AuditWarning::new(
                "INVALID_RULE_PARAMETERS",
                format!(
                    "Rule {} ({}) has unusable parameters: {}; static values used",
                    rule.rule_id, rule.rule_type, e
                ),
                "medium",
            ));
            None
        }
    }
}

fn static_multiplier(
    premium: Option<&MultiplierPremium>,
    crew: &CrewMember,
) -> Option<MultiplierRule> {
    premium
        .filter(|p| p.applies_to_category(crew.category))
        .map(|p| MultiplierRule {
            rule_id: p.rule_id.clone(),
            multiplier: p.multiplier,
        })
}

/// Resolves the rule for every component.
///
/// # Arguments
///
/// * `crew` - The crew member being paid
/// * `period_start` - Start of the pay period; selects effective rules
/// * `rule_set` - The static pay table
/// * `dynamic` - Rules read from the store, in any order
///
/// # Returns
///
/// The resolved rules and any warnings about unusable dynamic rules.
pub fn resolve_rules(
    crew: &CrewMember,
    period_start: NaiveDate,
    rule_set: &RuleSet,
    dynamic: &[PayRuleDefinition],
) -> (ResolvedPayRules, Vec<AuditWarning>) {
    let mut warnings = Vec::new();
    let rules = applicable_rules(crew, period_start, dynamic);
    let position = crew.position.to_ascii_uppercase();
    let pay = rule_set.pay_rules();

    let base = winning_params::<BasePayParams>(&rules, PayRuleType::BasePay, &mut warnings)
        .map(|(rule_id, p)| BaseRateRule {
            rule_id,
            hourly_rate: p.hourly_rate,
        })
        .or_else(|| {
            rule_set
                .base_rate(crew.category, &position)
                .map(|hourly_rate| BaseRateRule {
                    rule_id: format!("BASE-{}-{}", crew.category.code(), position),
                    hourly_rate,
                })
        });

    let per_diem = winning_params::<PerDiemParams>(&rules, PayRuleType::PerDiem, &mut warnings)
        .map(|(rule_id, p)| PerDiemRule {
            rule_id,
            hourly_rate: p.hourly_rate,
            minimum_duty_hours: p
                .minimum_duty_hours
                .unwrap_or(pay.per_diem.minimum_duty_hours),
        })
        .unwrap_or_else(|| PerDiemRule {
            rule_id: pay.per_diem.rule_id.clone(),
            hourly_rate: pay.per_diem.hourly_rate,
            minimum_duty_hours: pay.per_diem.minimum_duty_hours,
        });

    let overtime = winning_params::<OvertimeParams>(&rules, PayRuleType::Overtime, &mut warnings)
        .map(|(rule_id, p)| OvertimeRule {
            rule_id,
            monthly_threshold_hours: p.monthly_threshold_hours,
            multiplier: p.multiplier,
        })
        .or_else(|| {
            pay.overtime.as_ref().map(|o| OvertimeRule {
                rule_id: o.rule_id.clone(),
                monthly_threshold_hours: o.monthly_threshold_hours,
                multiplier: o.multiplier,
            })
        });

    let guarantee =
        winning_params::<GuaranteeParams>(&rules, PayRuleType::Guarantee, &mut warnings)
            .map(|(rule_id, p)| GuaranteeRule {
                rule_id,
                guaranteed_amount: p.guaranteed_amount,
            })
            .or_else(|| {
                rule_set
                    .guarantee(&position)
                    .map(|guaranteed_amount| GuaranteeRule {
                        rule_id: format!("GUAR-{position}"),
                        guaranteed_amount,
                    })
            });

    // Premiums: first usable rule of each kind wins, kinds stack.
    let mut night = None;
    let mut holiday = None;
    let mut international = None;
    let mut longevity = None;
    for rule in rules.iter().filter(|r| r.rule_type == PayRuleType::Premium) {
        let Some(params) = parse_params::<PremiumParams>(rule, &mut warnings) else {
            continue;
        };
        let rule_id = rule.rule_id.clone();
        match params {
            PremiumParams::Night {
                multiplier,
                applies_to,
            } if night.is_none() => {
                let premium = MultiplierPremium {
                    rule_id,
                    multiplier,
                    applies_to,
                };
                // A rule for another category leaves the slot open.
                night = static_multiplier(Some(&premium), crew);
            }
            PremiumParams::Holiday { multiplier } if holiday.is_none() => {
                holiday = Some(MultiplierRule {
                    rule_id,
                    multiplier,
                });
            }
            PremiumParams::International { flat_amount } if international.is_none() => {
                international = Some(FlatRule {
                    rule_id,
                    flat_amount,
                });
            }
            PremiumParams::Longevity { mut tiers } if longevity.is_none() => {
                tiers.sort_by_key(|t| t.min_years);
                longevity = Some(LongevityRule { rule_id, tiers });
            }
            _ => {}
        }
    }

    let resolved = ResolvedPayRules {
        base,
        per_diem,
        night: night.or_else(|| static_multiplier(pay.premiums.night.as_ref(), crew)),
        holiday: holiday.or_else(|| {
            pay.premiums.holiday.as_ref().map(|h| MultiplierRule {
                rule_id: h.rule_id.clone(),
                multiplier: h.multiplier,
            })
        }),
        international: international.or_else(|| {
            pay.premiums.international.as_ref().map(|i| FlatRule {
                rule_id: i.rule_id.clone(),
                flat_amount: i.flat_amount,
            })
        }),
        longevity: longevity.or_else(|| {
            pay.longevity.as_ref().map(|l| LongevityRule {
                rule_id: l.rule_id.clone(),
                tiers: l.tiers.clone(),
            })
        }),
        overtime,
        guarantee,
    };

    (resolved, warnings)
}
