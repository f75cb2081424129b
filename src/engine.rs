//! The engine facade.
//!
//! [`CrewRulesEngine`] wires one store and one rule set into the legality
//! validator, the compliance monitor and the pay calculator, and exposes
//! their operations from a single cloneable handle.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::compliance::ComplianceMonitor;
use crate::config::{RuleSet, RuleSetLoader};
use crate::error::EngineResult;
use crate::legality::LegalityValidator;
use crate::models::{
    AssignmentClearance, ComplianceAlert, ComplianceReport, LegalityResult, PayCalculation,
    ProposedDutyAssignment,
};
use crate::pay::{EstimatedHours, PayCalculator};
use crate::store::CrewDataStore;

/// Crew legality, compliance and pay over a shared store and rule set.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::CrewRulesEngine;
/// use crew_rules_engine::store::InMemoryStore;
/// use std::sync::Arc;
///
/// let engine = CrewRulesEngine::from_config_dir(Arc::new(InMemoryStore::new()), "./config/default")
///     .unwrap();
/// assert_eq!(engine.rule_set().version(), "2025.1");
/// ```
#[derive(Debug)]
pub struct CrewRulesEngine<S> {
    rule_set: Arc<RuleSet>,
    validator: LegalityValidator<S>,
    monitor: ComplianceMonitor<S>,
    calculator: PayCalculator<S>,
}

impl<S> Clone for CrewRulesEngine<S> {
    fn clone(&self) -> Self {
        Self {
            rule_set: Arc::clone(&self.rule_set),
            validator: self.validator.clone(),
            monitor: self.monitor.clone(),
            calculator: self.calculator.clone(),
        }
    }
}

impl<S: CrewDataStore> CrewRulesEngine<S> {
    /// Creates an engine over an already loaded rule set.
    pub fn new(store: Arc<S>, rule_set: Arc<RuleSet>) -> Self {
        Self {
            validator: LegalityValidator::new(Arc::clone(&store), Arc::clone(&rule_set)),
            monitor: ComplianceMonitor::new(Arc::clone(&store), Arc::clone(&rule_set)),
            calculator: PayCalculator::new(store, Arc::clone(&rule_set)),
            rule_set,
        }
    }

    /// Loads the rule set from `config_dir` and creates an engine over it.
    ///
    /// # Errors
    ///
    /// Any error from [`RuleSetLoader::load`].
    pub fn from_config_dir(store: Arc<S>, config_dir: impl AsRef<Path>) -> EngineResult<Self> {
        let rule_set = RuleSetLoader::load(config_dir)?;
        info!(
            rule_set = %rule_set.metadata().code,
            version = %rule_set.version(),
            "Crew rules engine ready"
        );
        Ok(Self::new(store, Arc::new(rule_set)))
    }

    /// The rule set every operation evaluates against.
    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// See [`LegalityValidator::validate_assignment`].
    pub async fn validate_assignment(
        &self,
        crew_id: &str,
        proposed: &ProposedDutyAssignment,
    ) -> EngineResult<LegalityResult> {
        self.validator.validate_assignment(crew_id, proposed).await
    }

    /// See [`LegalityValidator::validate_crew_pool`].
    pub async fn validate_crew_pool(
        &self,
        crew_ids: &[String],
        proposed: &ProposedDutyAssignment,
    ) -> BTreeMap<String, LegalityResult> {
        self.validator.validate_crew_pool(crew_ids, proposed).await
    }

    /// See [`ComplianceMonitor::check_crew_compliance`].
    pub async fn check_crew_compliance(
        &self,
        crew_id: &str,
        as_of: NaiveDate,
    ) -> EngineResult<Vec<ComplianceAlert>> {
        self.monitor.check_crew_compliance(crew_id, as_of).await
    }

    /// See [`ComplianceMonitor::check_all_crew`].
    pub async fn check_all_crew(&self, as_of: NaiveDate) -> EngineResult<ComplianceReport> {
        self.monitor.check_all_crew(as_of).await
    }

    /// See [`ComplianceMonitor::is_clear_for_assignment`].
    pub async fn is_clear_for_assignment(
        &self,
        crew_id: &str,
        proposed_hours: Decimal,
        as_of: NaiveDate,
    ) -> EngineResult<AssignmentClearance> {
        self.monitor
            .is_clear_for_assignment(crew_id, proposed_hours, as_of)
            .await
    }

    /// See [`PayCalculator::calculate_pay`].
    pub async fn calculate_pay(
        &self,
        crew_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<PayCalculation> {
        self.calculator.calculate_pay(crew_id, start, end).await
    }

    /// See [`PayCalculator::estimate_pay`].
    pub async fn estimate_pay(
        &self,
        crew_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        hours: EstimatedHours,
    ) -> EngineResult<PayCalculation> {
        self.calculator.estimate_pay(crew_id, start, end, hours).await
    }

    /// See [`PayCalculator::calculate_bulk_pay`].
    pub async fn calculate_bulk_pay(
        &self,
        crew_ids: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<PayCalculation> {
        self.calculator.calculate_bulk_pay(crew_ids, start, end).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::store::InMemoryStore;

    #[test]
    fn test_engine_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<CrewRulesEngine<InMemoryStore>>();
    }

    #[test]
    fn test_missing_config_dir_fails() {
        let err = CrewRulesEngine::from_config_dir(Arc::new(InMemoryStore::new()), "/nonexistent/rules")
            .unwrap_err();
        assert!(matches!(err, EngineError::ConfigNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_crew_propagates_not_found() {
        let engine = CrewRulesEngine::from_config_dir(
            Arc::new(InMemoryStore::new()),
            concat!(env!("CARGO_MANIFEST_DIR"), "/config/default"),
        )
        .unwrap();
        let as_of = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();

        let err = engine.check_crew_compliance("ghost", as_of).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
