//! Legality validation orchestration.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RuleSet;
use crate::error::{EngineError, EngineResult};
use crate::models::{DutyLimitCheck, DutyTimeRecord, LegalityResult, ProposedDutyAssignment};
use crate::rolling::{consecutive_duty_days, history_start, rolling_hours_from_records};
use crate::store::CrewDataStore;

use super::{
    build_recommendations, check_fdp_limits, check_qualifications, check_rest,
    check_rolling_limits,
};

/// Decides whether crew members may legally take a proposed duty.
///
/// Holds the store and the rule set; each validation reads the crew
/// member's qualifications and one year of duty history, then runs the
/// qualification, rest, FDP and rolling-limit checks over that snapshot.
#[derive(Debug)]
pub struct LegalityValidator<S> {
    store: Arc<S>,
    rule_set: Arc<RuleSet>,
}

impl<S> Clone for LegalityValidator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            rule_set: Arc::clone(&self.rule_set),
        }
    }
}

impl<S: CrewDataStore> LegalityValidator<S> {
    /// Creates a validator over a store and rule set.
    pub fn new(store: Arc<S>, rule_set: Arc<RuleSet>) -> Self {
        Self { store, rule_set }
    }

    /// Validates one crew member against a proposed duty.
    ///
    /// # Errors
    ///
    /// - `InvalidAssignment` when the proposed duty ends before it starts or
    ///   carries a negative flight estimate
    /// - `CrewNotFound` when the identifier resolves to no crew member
    /// - `Store` when any read fails
    pub async fn validate_assignment(
        &self,
        crew_id: &str,
        proposed: &ProposedDutyAssignment,
    ) -> EngineResult<LegalityResult> {
        proposed.validate()?;

        let crew = self
            .store
            .get_crew_member(crew_id)
            .await?
            .ok_or_else(|| EngineError::CrewNotFound {
                crew_id: crew_id.to_string(),
            })?;

        let proposed_date = proposed.start_date();
        let (ratings, medical, training, history) = futures::try_join!(
            self.store.get_aircraft_type_ratings(&crew.id),
            self.store.get_medical_certificate(&crew.id),
            self.store.get_training_records(&crew.id),
            self.store.get_duty_time_records(
                &crew.id,
                history_start(proposed_date),
                proposed_date
            ),
        )?;

        // Only duties that reported before the proposed start count as history.
        let prior: Vec<DutyTimeRecord> = history
            .into_iter()
            .filter(|r| r.start_time < proposed.start_time)
            .collect();

        debug!(
            crew_id = %crew.id,
            prior_duties = prior.len(),
            "Loaded legality inputs"
        );

        let qualification_issues = check_qualifications(
            &proposed.aircraft_type,
            &ratings,
            medical.as_ref(),
            &training,
        );
        let rest_compliance = check_rest(&prior, proposed.start_time, &self.rule_set);
        let fdp = check_fdp_limits(proposed, &self.rule_set);
        let rolling = check_rolling_limits(
            rolling_hours_from_records(&prior, proposed_date),
            proposed.flight_hours(),
            &self.rule_set,
        );
        let duty_limits = DutyLimitCheck {
            fdp,
            rolling,
            consecutive_duty_days: consecutive_duty_days(
                prior.iter().map(|r| r.duty_date),
                proposed_date,
            ),
        };

        let is_legal = qualification_issues.is_empty()
            && rest_compliance.is_compliant
            && duty_limits.is_compliant();

        let recommendations = build_recommendations(
            &qualification_issues,
            &rest_compliance,
            &duty_limits,
            &self.rule_set,
        );

        info!(
            crew_id = %crew.id,
            aircraft_type = %proposed.aircraft_type,
            proposed_start = %proposed.start_time,
            is_legal,
            qualification_issues = qualification_issues.len(),
            rest_compliant = rest_compliance.is_compliant,
            fdp_compliant = duty_limits.fdp.is_compliant,
            rolling_compliant = duty_limits.rolling.is_compliant(),
            "Validated assignment"
        );

        Ok(LegalityResult {
            crew_id: crew.id,
            aircraft_type: proposed.aircraft_type.clone(),
            proposed_start: proposed.start_time,
            is_legal,
            qualification_issues,
            rest_compliance,
            duty_limits,
            recommendations,
        })
    }

    /// Validates every crew member in `crew_ids` against the same duty.
    ///
    /// Crew members are evaluated concurrently and independently. A crew
    /// member whose evaluation fails is logged and left out of the map.
    pub async fn validate_crew_pool(
        &self,
        crew_ids: &[String],
        proposed: &ProposedDutyAssignment,
    ) -> BTreeMap<String, LegalityResult> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            crew_count = crew_ids.len(),
            aircraft_type = %proposed.aircraft_type,
            "Validating crew pool"
        );

        let outcomes = join_all(crew_ids.iter().map(|crew_id| async move {
            (crew_id, self.validate_assignment(crew_id, proposed).await)
        }))
        .await;

        let mut results = BTreeMap::new();
        for (crew_id, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    results.insert(crew_id.clone(), result);
                }
                Err(e) => {
                    warn!(
                        correlation_id = %correlation_id,
                        crew_id = %crew_id,
                        error = %e,
                        "Skipping crew member in pool validation"
                    );
                }
            }
        }

        info!(
            correlation_id = %correlation_id,
            evaluated = results.len(),
            failed = crew_ids.len() - results.len(),
            "Crew pool validated"
        );

        results
    }
}
