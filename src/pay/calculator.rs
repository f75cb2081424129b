//! Pay calculation over recorded or estimated duty.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RuleSet;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AppliedRule, CrewMember, DutySummary, DutyTimeRecord, PayCalculation, PayContext, PayPeriod,
    PayRuleDefinition, PeriodTotals,
};
use crate::rolling::{minutes_to_hours, whole_years_between};
use crate::store::CrewDataStore;

use super::{NIGHT_HOURS_CAP_PER_DUTY_MINUTES, evaluate_pay, resolve_rules};

/// Hours supplied by a caller planning a month rather than paying one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedHours {
    pub flight_hours: Decimal,
    pub duty_hours: Decimal,
    #[serde(default)]
    pub block_hours: Decimal,
    #[serde(default)]
    pub duty_days: u32,
    #[serde(default)]
    pub night_hours: Decimal,
    #[serde(default)]
    pub international_trips: u32,
    #[serde(default)]
    pub holiday_hours: Decimal,
}

/// Aggregates duty records into period totals.
///
/// Minutes are summed before conversion so totals carry no per-record
/// rounding. Night hours credit each circadian-low duty with at most four
/// hours of its duty time; holiday hours are the flight hours of duties
/// dated on a configured public holiday.
///
/// # Arguments
///
/// * `records` - The period's duty records
/// * `crew` - The crew member, for years of service
/// * `period` - The pay period; years of service are counted to its end
/// * `rule_set` - Supplies the public holiday calendar
pub fn aggregate_totals(
    records: &[DutyTimeRecord],
    crew: &CrewMember,
    period: &PayPeriod,
    rule_set: &RuleSet,
) -> PeriodTotals {
    let mut flight_minutes = 0i64;
    let mut duty_minutes = 0i64;
    let mut block_minutes = 0i64;
    let mut night_minutes = 0i64;
    let mut holiday_minutes = 0i64;
    let mut international_trips = 0u32;
    let mut duty_days = BTreeSet::new();

    for record in records {
        flight_minutes += record.flight_minutes;
        duty_minutes += record.duty_minutes;
        block_minutes += record.block_minutes;
        duty_days.insert(record.duty_date);

        if record.crosses_wocl {
            night_minutes += record.duty_minutes.min(NIGHT_HOURS_CAP_PER_DUTY_MINUTES);
        }
        if record.is_international {
            international_trips += 1;
        }
        if rule_set.is_public_holiday(record.duty_date) {
            holiday_minutes += record.flight_minutes;
        }
    }

    PeriodTotals {
        flight_hours: minutes_to_hours(flight_minutes),
        duty_hours: minutes_to_hours(duty_minutes),
        block_hours: minutes_to_hours(block_minutes),
        duty_days: duty_days.len() as u32,
        night_hours: minutes_to_hours(night_minutes),
        international_trips,
        holiday_hours: minutes_to_hours(holiday_minutes),
        years_of_service: whole_years_between(crew.hire_date, period.end_date),
    }
}

fn context_from_totals(crew: CrewMember, period: PayPeriod, totals: &PeriodTotals) -> PayContext {
    PayContext {
        crew,
        period,
        flight_hours: totals.flight_hours,
        duty_hours: totals.duty_hours,
        block_hours: totals.block_hours,
        duty_days: totals.duty_days,
        night_hours: totals.night_hours,
        international_trips: totals.international_trips,
        holiday_hours: totals.holiday_hours,
        years_of_service: totals.years_of_service,
    }
}

/// Computes compensation for crew members over a pay period.
///
/// Static pay tables come from the shared [`RuleSet`]; dynamic rules are
/// read from the store on every calculation so rule changes take effect
/// without a reload.
#[derive(Debug)]
pub struct PayCalculator<S> {
    store: Arc<S>,
    rule_set: Arc<RuleSet>,
}

impl<S> Clone for PayCalculator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            rule_set: Arc::clone(&self.rule_set),
        }
    }
}

impl<S: CrewDataStore> PayCalculator<S> {
    pub fn new(store: Arc<S>, rule_set: Arc<RuleSet>) -> Self {
        Self { store, rule_set }
    }

    async fn find_crew(&self, crew_id: &str) -> EngineResult<CrewMember> {
        self.store
            .get_crew_member(crew_id)
            .await?
            .ok_or_else(|| EngineError::CrewNotFound {
                crew_id: crew_id.to_string(),
            })
    }

    /// Computes pay from the duty records in `[start, end]`.
    ///
    /// Calling this twice over unchanged store contents returns equal
    /// results.
    ///
    /// # Errors
    ///
    /// - `InvalidPeriod` when `end` is before `start`
    /// - `CrewNotFound` when the identifier resolves to no crew member
    /// - `InvalidDutyRecord` when a record in the period is malformed
    /// - `Store` when a read fails
    pub async fn calculate_pay(
        &self,
        crew_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<PayCalculation> {
        let period = PayPeriod::new(start, end)?;
        let crew = self.find_crew(crew_id).await?;

        let (records, dynamic_rules) = futures::try_join!(
            self.store.get_duty_time_records(&crew.id, start, end),
            self.store.get_pay_calculation_rules(
                crew.category,
                Some(crew.position.as_str()),
                Some(start)
            ),
        )?;

        for record in &records {
            record.validate()?;
        }

        let totals = aggregate_totals(&records, &crew, &period, &self.rule_set);
        debug!(
            crew_id = %crew.id,
            duty_records = records.len(),
            flight_hours = %totals.flight_hours,
            duty_hours = %totals.duty_hours,
            "Aggregated pay period"
        );

        let duty_summaries = records
            .iter()
            .map(|r| DutySummary {
                duty_id: r.id.clone(),
                duty_date: r.duty_date,
                flight_hours: r.flight_hours(),
                duty_hours: r.duty_hours(),
                crosses_wocl: r.crosses_wocl,
                is_international: r.is_international,
            })
            .collect();

        let calculation = self.assemble(crew, period, totals, &dynamic_rules, duty_summaries, false);
        info!(
            crew_id = %calculation.crew_id,
            period_start = %start,
            period_end = %end,
            total_compensation = %calculation.total_compensation,
            warnings = calculation.audit_trace.warnings.len(),
            "Calculated pay"
        );
        Ok(calculation)
    }

    /// Computes pay from caller-supplied hours instead of duty records.
    ///
    /// The result is flagged as an estimate and carries no duty summaries.
    pub async fn estimate_pay(
        &self,
        crew_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        hours: EstimatedHours,
    ) -> EngineResult<PayCalculation> {
        let period = PayPeriod::new(start, end)?;
        let crew = self.find_crew(crew_id).await?;
        let dynamic_rules = self
            .store
            .get_pay_calculation_rules(crew.category, Some(crew.position.as_str()), Some(start))
            .await?;

        let totals = PeriodTotals {
            flight_hours: hours.flight_hours,
            duty_hours: hours.duty_hours,
            block_hours: hours.block_hours,
            duty_days: hours.duty_days,
            night_hours: hours.night_hours,
            international_trips: hours.international_trips,
            holiday_hours: hours.holiday_hours,
            years_of_service: whole_years_between(crew.hire_date, end),
        };

        let calculation = self.assemble(crew, period, totals, &dynamic_rules, Vec::new(), true);
        info!(
            crew_id = %calculation.crew_id,
            total_compensation = %calculation.total_compensation,
            "Estimated pay"
        );
        Ok(calculation)
    }

    /// Computes pay for many crew members concurrently.
    ///
    /// Each crew member is calculated independently; failures are logged
    /// and left out, so the result may be shorter than `crew_ids`. Results
    /// follow the order of `crew_ids`.
    pub async fn calculate_bulk_pay(
        &self,
        crew_ids: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<PayCalculation> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            crew_count = crew_ids.len(),
            period_start = %start,
            period_end = %end,
            "Calculating bulk pay"
        );

        let outcomes = join_all(crew_ids.iter().map(|crew_id| async move {
            (crew_id, self.calculate_pay(crew_id, start, end).await)
        }))
        .await;

        let mut results = Vec::with_capacity(crew_ids.len());
        for (crew_id, outcome) in outcomes {
            match outcome {
                Ok(calculation) => results.push(calculation),
                Err(e) => {
                    warn!(
                        correlation_id = %correlation_id,
                        crew_id = %crew_id,
                        error = %e,
                        "Skipping crew member in bulk pay"
                    );
                }
            }
        }

        info!(
            correlation_id = %correlation_id,
            calculated = results.len(),
            failed = crew_ids.len() - results.len(),
            "Bulk pay calculated"
        );

        results
    }

    fn assemble(
        &self,
        crew: CrewMember,
        period: PayPeriod,
        totals: PeriodTotals,
        dynamic_rules: &[PayRuleDefinition],
        duty_records: Vec<DutySummary>,
        is_estimate: bool,
    ) -> PayCalculation {
        let (rules, rule_warnings) =
            resolve_rules(&crew, period.start_date, &self.rule_set, dynamic_rules);
        let crew_id = crew.id.clone();
        let context = context_from_totals(crew, period, &totals);

        let mut evaluation = evaluate_pay(&context, &rules);
        evaluation.audit_trace.warnings.splice(0..0, rule_warnings);

        let applied_rules = evaluation
            .breakdown
            .components()
            .filter(|c| c.amount > Decimal::ZERO)
            .filter_map(|c| {
                c.rule_id.as_ref().map(|rule_id| AppliedRule {
                    rule_id: rule_id.clone(),
                    rule_name: c.name.clone(),
                    rule_type: c.component_type,
                    amount: c.amount,
                })
            })
            .collect();

        PayCalculation {
            crew_id,
            period,
            is_estimate,
            totals,
            total_compensation: evaluation.total(),
            breakdown: evaluation.breakdown,
            applied_rules,
            duty_records,
            audit_trace: evaluation.audit_trace,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            rule_set_version: self.rule_set.version().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_rule_set;
    use crate::models::{CrewCategory, CrewStatus, PayRuleType};
    use crate::pay::test_support::dec;
    use crate::store::InMemoryStore;
    use chrono::{Duration, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn captain(id: &str, hire_date: NaiveDate) -> CrewMember {
        CrewMember {
            id: id.to_string(),
            employee_number: format!("E-{id}"),
            first_name: "Test".to_string(),
            last_name: "Captain".to_string(),
            category: CrewCategory::Pilot,
            position: "CAPTAIN".to_string(),
            base: "JFK".to_string(),
            hire_date,
            status: CrewStatus::Active,
        }
    }

    fn duty(
        id: &str,
        crew_id: &str,
        day: NaiveDate,
        flight_minutes: i64,
        duty_minutes: i64,
    ) -> DutyTimeRecord {
        let start = Utc.from_utc_datetime(&day.and_hms_opt(8, 0, 0).unwrap());
        DutyTimeRecord {
            id: id.to_string(),
            crew_id: crew_id.to_string(),
            duty_date: day,
            start_time: start,
            end_time: Some(start + Duration::minutes(duty_minutes)),
            flight_minutes,
            duty_minutes,
            block_minutes: 0,
            segment_count: 2,
            is_fdp: true,
            crosses_wocl: false,
            is_international: false,
        }
    }

    fn calculator(store: InMemoryStore) -> PayCalculator<InMemoryStore> {
        PayCalculator::new(Arc::new(store), Arc::new(default_rule_set()))
    }

    // ==========================================================================
    // Aggregation
    // ==========================================================================

    #[test]
    fn test_aggregate_totals() {
        let rule_set = default_rule_set();
        let crew = captain("c1", date(2015, 6, 15));
        let period = PayPeriod::new(date(2025, 7, 1), date(2025, 7, 31)).unwrap();

        let mut overnight = duty("d1", "c1", date(2025, 7, 3), 300, 420);
        overnight.crosses_wocl = true;
        let mut short_night = duty("d2", "c1", date(2025, 7, 3), 90, 150);
        short_night.crosses_wocl = true;
        let mut holiday = duty("d3", "c1", date(2025, 7, 4), 240, 360);
        holiday.is_international = true;

        let totals = aggregate_totals(&[overnight, short_night, holiday], &crew, &period, &rule_set);

        assert_eq!(totals.flight_hours, dec("10.5"));
        assert_eq!(totals.duty_hours, dec("15.5"));
        assert_eq!(totals.duty_days, 2);
        // 240 (capped) + 150 minutes
        assert_eq!(totals.night_hours, dec("6.5"));
        assert_eq!(totals.international_trips, 1);
        assert_eq!(totals.holiday_hours, dec("4"));
        assert_eq!(totals.years_of_service, 10);
    }

    // ==========================================================================
    // calculate_pay
    // ==========================================================================

    #[tokio::test]
    async fn test_calculate_pay_from_records() {
        let store = InMemoryStore::new()
            .with_crew_member(captain("c1", date(2024, 1, 1)))
            .with_duty_records(vec![
                duty("d1", "c1", date(2025, 3, 3), 330, 480),
                duty("d2", "c1", date(2025, 3, 5), 300, 420),
            ]);

        let calculation = calculator(store)
            .calculate_pay("c1", date(2025, 3, 1), date(2025, 3, 31))
            .await
            .unwrap();

        // 10.5h * $250
        assert_eq!(calculation.breakdown.base_pay.amount, dec("2625.00"));
        // 15h * $2.50
        assert_eq!(calculation.breakdown.per_diem.amount, dec("37.50"));
        assert_eq!(calculation.breakdown.guarantee.amount, dec("16125.00"));
        assert_eq!(calculation.total_compensation, dec("18787.50"));
        assert_eq!(calculation.duty_records.len(), 2);
        assert!(!calculation.is_estimate);
        assert_eq!(calculation.rule_set_version, "2025.1");

        let applied: Vec<&str> = calculation
            .applied_rules
            .iter()
            .map(|r| r.rule_id.as_str())
            .collect();
        assert_eq!(applied, vec!["BASE-PILOT-CAPTAIN", "PD-STD", "GUAR-CAPTAIN"]);
    }

    #[tokio::test]
    async fn test_calculate_pay_rejects_inverted_period() {
        let store = InMemoryStore::new().with_crew_member(captain("c1", date(2024, 1, 1)));

        let err = calculator(store)
            .calculate_pay("c1", date(2025, 3, 31), date(2025, 3, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::InvalidPeriod { .. }));
    }

    #[tokio::test]
    async fn test_calculate_pay_rejects_malformed_record() {
        let store = InMemoryStore::new()
            .with_crew_member(captain("c1", date(2024, 1, 1)))
            .with_duty_records(vec![duty("bad", "c1", date(2025, 3, 3), 500, 400)]);

        let err = calculator(store)
            .calculate_pay("c1", date(2025, 3, 1), date(2025, 3, 31))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::InvalidDutyRecord { ref duty_id, .. } if duty_id == "bad"));
    }

    #[tokio::test]
    async fn test_dynamic_rule_overrides_static_rate() {
        let store = InMemoryStore::new()
            .with_crew_member(captain("c1", date(2024, 1, 1)))
            .with_duty_records(vec![duty("d1", "c1", date(2025, 3, 3), 600, 720)])
            .with_pay_rule(PayRuleDefinition {
                rule_id: "BASE-2025-CA".to_string(),
                rule_name: "2025 captain rate".to_string(),
                rule_type: PayRuleType::BasePay,
                crew_type: Some(CrewCategory::Pilot),
                position: Some("CAPTAIN".to_string()),
                effective_date: date(2025, 1, 1),
                expiration_date: None,
                parameters: serde_json::json!({ "hourly_rate": "262.50" }),
            });

        let calculation = calculator(store)
            .calculate_pay("c1", date(2025, 3, 1), date(2025, 3, 31))
            .await
            .unwrap();

        assert_eq!(calculation.breakdown.base_pay.amount, dec("2625.00"));
        assert_eq!(calculation.breakdown.base_pay.rule_id.as_deref(), Some("BASE-2025-CA"));
    }

    // ==========================================================================
    // estimate_pay and bulk
    // ==========================================================================

    #[tokio::test]
    async fn test_estimate_pay_uses_supplied_hours() {
        let store = InMemoryStore::new().with_crew_member(captain("c1", date(2024, 1, 1)));
        let hours = EstimatedHours {
            flight_hours: dec("80"),
            duty_hours: dec("110"),
            ..Default::default()
        };

        let calculation = calculator(store)
            .estimate_pay("c1", date(2025, 3, 1), date(2025, 3, 31), hours)
            .await
            .unwrap();

        assert!(calculation.is_estimate);
        assert!(calculation.duty_records.is_empty());
        assert_eq!(calculation.breakdown.base_pay.amount, dec("20000.00"));
        assert_eq!(calculation.breakdown.guarantee.amount, dec("0"));
    }

    #[tokio::test]
    async fn test_bulk_pay_isolates_failures() {
        let store = InMemoryStore::new()
            .with_crew_member(captain("c1", date(2024, 1, 1)))
            .with_crew_member(captain("c2", date(2024, 1, 1)))
            .with_crew_member(captain("c3", date(2024, 1, 1)))
            .fail_reads_for("c2");
        let crew_ids = vec![
            "c3".to_string(),
            "c2".to_string(),
            "ghost".to_string(),
            "c1".to_string(),
        ];

        let results = calculator(store)
            .calculate_bulk_pay(&crew_ids, date(2025, 3, 1), date(2025, 3, 31))
            .await;

        let ids: Vec<&str> = results.iter().map(|r| r.crew_id.as_str()).collect();
        assert_eq!(ids, vec!["c3", "c1"]);
    }
}
