//! Compliance monitor over the active crew population.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::RuleSet;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AssignmentClearance, ComplianceAlert, ComplianceReport, ComplianceSnapshot, CrewCategory,
    CrewMember,
};
use crate::rolling::rolling_hours;
use crate::store::CrewDataStore;

use super::grade_alerts;

/// Re-evaluates rolling flight-time thresholds and raises graded alerts.
#[derive(Debug)]
pub struct ComplianceMonitor<S> {
    store: Arc<S>,
    rule_set: Arc<RuleSet>,
}

impl<S> Clone for ComplianceMonitor<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            rule_set: Arc::clone(&self.rule_set),
        }
    }
}

impl<S: CrewDataStore> ComplianceMonitor<S> {
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

    /// Alerts for one crew member's rolling totals as of `as_of`.
    pub async fn check_crew_compliance(
        &self,
        crew_id: &str,
        as_of: NaiveDate,
    ) -> EngineResult<Vec<ComplianceAlert>> {
        let crew = self.find_crew(crew_id).await?;
        let hours = rolling_hours(self.store.as_ref(), &crew.id, as_of).await?;
        Ok(grade_alerts(&crew.id, hours, &self.rule_set))
    }

    /// Checks every active pilot and records a snapshot for each.
    ///
    /// A crew member whose check or snapshot write fails is logged and
    /// listed in `crew_failed`; the sweep continues with the rest.
    ///
    /// # Errors
    ///
    /// Returns `Store` only when the active pilot list cannot be read.
    pub async fn check_all_crew(&self, as_of: NaiveDate) -> EngineResult<ComplianceReport> {
        let correlation_id = Uuid::new_v4();
        let pilots = self
            .store
            .get_active_crew_members(CrewCategory::Pilot)
            .await?;

        info!(
            correlation_id = %correlation_id,
            as_of = %as_of,
            crew_count = pilots.len(),
            "Starting compliance sweep"
        );

        let outcomes = join_all(pilots.iter().map(|crew| async move {
            (crew.id.as_str(), self.check_and_record(&crew.id, as_of).await)
        }))
        .await;

        let mut report = ComplianceReport {
            as_of_date: as_of,
            crew_checked: 0,
            crew_failed: Vec::new(),
            alerts: Vec::new(),
        };
        for (crew_id, outcome) in outcomes {
            match outcome {
                Ok(alerts) => {
                    report.crew_checked += 1;
                    report.alerts.extend(alerts);
                }
                Err(e) => {
                    warn!(
                        correlation_id = %correlation_id,
                        crew_id = %crew_id,
                        error = %e,
                        "Compliance check failed; skipping crew member"
                    );
                    report.crew_failed.push(crew_id.to_string());
                }
            }
        }

        info!(
            correlation_id = %correlation_id,
            checked = report.crew_checked,
            failed = report.crew_failed.len(),
            alerts = report.alerts.len(),
            "Compliance sweep finished"
        );

        Ok(report)
    }

    async fn check_and_record(
        &self,
        crew_id: &str,
        as_of: NaiveDate,
    ) -> EngineResult<Vec<ComplianceAlert>> {
        let hours = rolling_hours(self.store.as_ref(), crew_id, as_of).await?;
        let alerts = grade_alerts(crew_id, hours, &self.rule_set);

        let snapshot = ComplianceSnapshot {
            snapshot_id: Uuid::new_v4(),
            crew_id: crew_id.to_string(),
            as_of_date: as_of,
            flight_hours_28_days: hours.hours_28_days,
            flight_hours_365_days: hours.hours_365_days,
            rest_compliance: hours.hours_28_days < self.rule_set.limit_28_days(),
            fdp_compliance: hours.hours_365_days < self.rule_set.limit_365_days(),
            alert_count: alerts.len(),
        };
        self.store.record_compliance_snapshot(snapshot).await?;

        Ok(alerts)
    }

    /// Fast pre-check: would `proposed_hours` more flight time breach a
    /// ceiling?
    ///
    /// Not clear iff a projected total strictly exceeds its ceiling. The
    /// 28-day ceiling is reported ahead of the 365-day one.
    pub async fn is_clear_for_assignment(
        &self,
        crew_id: &str,
        proposed_hours: Decimal,
        as_of: NaiveDate,
    ) -> EngineResult<AssignmentClearance> {
        let crew = self.find_crew(crew_id).await?;
        let projected = rolling_hours(self.store.as_ref(), &crew.id, as_of)
            .await?
            .projected(proposed_hours);
        let limit_28 = self.rule_set.limit_28_days();
        let limit_365 = self.rule_set.limit_365_days();

        let breach = if projected.hours_28_days > limit_28 {
            Some(format!(
                "Would exceed 28-day limit: {}h projected against {}h",
                fmt(projected.hours_28_days),
                fmt(limit_28)
            ))
        } else if projected.hours_365_days > limit_365 {
            Some(format!(
                "Would exceed 365-day limit: {}h projected against {}h",
                fmt(projected.hours_365_days),
                fmt(limit_365)
            ))
        } else {
            None
        };

        let is_clear = breach.is_none();
        let reason = breach.unwrap_or_else(|| {
            format!(
                "Clear: {}h of {}h (28-day), {}h of {}h (365-day)",
                fmt(projected.hours_28_days),
                fmt(limit_28),
                fmt(projected.hours_365_days),
                fmt(limit_365)
            )
        });

        info!(
            crew_id = %crew.id,
            proposed_hours = %proposed_hours,
            is_clear,
            "Assignment pre-check"
        );

        Ok(AssignmentClearance {
            crew_id: crew.id,
            is_clear,
            reason,
            projected_28_days: projected.hours_28_days,
            projected_365_days: projected.hours_365_days,
        })
    }
}

fn fmt(value: Decimal) -> Decimal {
    value.round_dp(2).normalize()
}
