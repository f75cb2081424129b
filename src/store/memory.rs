//! In-memory [`CrewDataStore`].

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::{CrewDataStore, StoreError, StoreResult};
use crate::models::{
    AircraftTypeRating, ComplianceSnapshot, CrewCategory, CrewMember, DutyTimeRecord,
    MedicalCertificate, PayRuleDefinition, TrainingRecord,
};

/// A store backed by plain collections.
///
/// Built once with the `with_*` methods and then shared read-only; only
/// recorded compliance snapshots mutate after construction.
///
/// # Example
///
/// ```
/// use crew_rules_engine::store::{CrewDataStore, InMemoryStore};
/// use crew_rules_engine::models::{CrewCategory, CrewMember, CrewStatus};
/// use chrono::NaiveDate;
///
/// # tokio_test_block(async {
/// let store = InMemoryStore::new().with_crew_member(CrewMember {
///     id: "crew_001".to_string(),
///     employee_number: "E1001".to_string(),
///     first_name: "Ada".to_string(),
///     last_name: "Lovelace".to_string(),
///     category: CrewCategory::Pilot,
///     position: "CAPTAIN".to_string(),
///     base: "JFK".to_string(),
///     hire_date: NaiveDate::from_ymd_opt(2015, 6, 15).unwrap(),
///     status: CrewStatus::Active,
/// });
///
/// let found = store.get_crew_member("E1001").await.unwrap();
/// assert_eq!(found.map(|c| c.id), Some("crew_001".to_string()));
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    crew: Vec<CrewMember>,
    duties: HashMap<String, Vec<DutyTimeRecord>>,
    ratings: HashMap<String, Vec<AircraftTypeRating>>,
    medicals: HashMap<String, MedicalCertificate>,
    training: HashMap<String, Vec<TrainingRecord>>,
    pay_rules: Vec<PayRuleDefinition>,
    failing_crew: HashSet<String>,
    snapshots: RwLock<Vec<ComplianceSnapshot>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crew_member(mut self, crew: CrewMember) -> Self {
        self.crew.push(crew);
        self
    }

    pub fn with_duty_records(mut self, records: impl IntoIterator<Item = DutyTimeRecord>) -> Self {
        for record in records {
            self.duties
                .entry(record.crew_id.clone())
                .or_default()
                .push(record);
        }
        self
    }

    pub fn with_type_rating(mut self, rating: AircraftTypeRating) -> Self {
        self.ratings
            .entry(rating.crew_id.clone())
            .or_default()
            .push(rating);
        self
    }

    pub fn with_medical(mut self, medical: MedicalCertificate) -> Self {
        self.medicals.insert(medical.crew_id.clone(), medical);
        self
    }

    pub fn with_training(mut self, record: TrainingRecord) -> Self {
        self.training
            .entry(record.crew_id.clone())
            .or_default()
            .push(record);
        self
    }

    pub fn with_pay_rule(mut self, rule: PayRuleDefinition) -> Self {
        self.pay_rules.push(rule);
        self
    }

    /// Makes every read scoped to `crew_id` fail with
    /// [`StoreError::Unavailable`].
    pub fn fail_reads_for(mut self, crew_id: impl Into<String>) -> Self {
        self.failing_crew.insert(crew_id.into());
        self
    }

    /// Snapshots recorded so far, in recording order.
    pub async fn snapshots(&self) -> Vec<ComplianceSnapshot> {
        self.snapshots.read().await.clone()
    }

    fn check_available(&self, crew_id: &str) -> StoreResult<()> {
        if self.failing_crew.contains(crew_id) {
            return Err(StoreError::Unavailable {
                message: format!("read failed for crew {crew_id}"),
            });
        }
        Ok(())
    }
}

impl CrewDataStore for InMemoryStore {
    async fn get_crew_member(&self, identifier: &str) -> StoreResult<Option<CrewMember>> {
        self.check_available(identifier)?;
        let crew = self
            .crew
            .iter()
            .find(|c| c.id == identifier || c.employee_number == identifier)
            .cloned();
        if let Some(crew) = &crew {
            self.check_available(&crew.id)?;
        }
        Ok(crew)
    }

    async fn get_active_crew_members(
        &self,
        category: CrewCategory,
    ) -> StoreResult<Vec<CrewMember>> {
        Ok(self
            .crew
            .iter()
            .filter(|c| c.category == category && c.is_active())
            .cloned()
            .collect())
    }

    async fn get_duty_time_records(
        &self,
        crew_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<DutyTimeRecord>> {
        self.check_available(crew_id)?;
        let mut records: Vec<DutyTimeRecord> = self
            .duties
            .get(crew_id)
            .map(|all| {
                all.iter()
                    .filter(|r| r.duty_date >= from && r.duty_date <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        records.sort_by_key(|r| r.start_time);
        Ok(records)
    }

    async fn get_aircraft_type_ratings(
        &self,
        crew_id: &str,
    ) -> StoreResult<Vec<AircraftTypeRating>> {
        self.check_available(crew_id)?;
        Ok(self.ratings.get(crew_id).cloned().unwrap_or_default())
    }

    async fn get_medical_certificate(
        &self,
        crew_id: &str,
    ) -> StoreResult<Option<MedicalCertificate>> {
        self.check_available(crew_id)?;
        Ok(self.medicals.get(crew_id).cloned())
    }

    async fn get_training_records(&self, crew_id: &str) -> StoreResult<Vec<TrainingRecord>> {
        self.check_available(crew_id)?;
        Ok(self.training.get(crew_id).cloned().unwrap_or_default())
    }

    async fn get_pay_calculation_rules(
        &self,
        crew_type: CrewCategory,
        position: Option<&str>,
        effective_date: Option<NaiveDate>,
    ) -> StoreResult<Vec<PayRuleDefinition>> {
        Ok(self
            .pay_rules
            .iter()
            .filter(|r| r.crew_type.is_none_or(|c| c == crew_type))
            .filter(|r| match (position, r.position.as_deref()) {
                (Some(wanted), Some(rule_position)) => rule_position.eq_ignore_ascii_case(wanted),
                _ => true,
            })
            .filter(|r| effective_date.is_none_or(|d| r.effective_date <= d))
            .cloned()
            .collect())
    }

    async fn record_compliance_snapshot(&self, snapshot: ComplianceSnapshot) -> StoreResult<()> {
        self.check_available(&snapshot.crew_id)?;
        self.snapshots.write().await.push(snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CrewStatus;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_crew(id: &str, category: CrewCategory, status: CrewStatus) -> CrewMember {
        CrewMember {
            id: id.to_string(),
            employee_number: format!("E-{id}"),
            first_name: "Test".to_string(),
            last_name: "Crew".to_string(),
            category,
            position: "CAPTAIN".to_string(),
            base: "JFK".to_string(),
            hire_date: date(2015, 1, 1),
            status,
        }
    }

    fn create_duty(id: &str, crew_id: &str, day: u32) -> DutyTimeRecord {
        DutyTimeRecord {
            id: id.to_string(),
            crew_id: crew_id.to_string(),
            duty_date: date(2025, 3, day),
            start_time: Utc.with_ymd_and_hms(2025, 3, day, 8, 0, 0).unwrap(),
            end_time: Some(Utc.with_ymd_and_hms(2025, 3, day, 16, 0, 0).unwrap()),
            flight_minutes: 300,
            duty_minutes: 480,
            block_minutes: 330,
            segment_count: 2,
            is_fdp: true,
            crosses_wocl: false,
            is_international: false,
        }
    }

    #[tokio::test]
    async fn test_duty_records_filtered_and_sorted() {
        let store = InMemoryStore::new().with_duty_records(vec![
            create_duty("d3", "crew_001", 20),
            create_duty("d1", "crew_001", 5),
            create_duty("d2", "crew_001", 10),
            create_duty("x1", "crew_002", 10),
        ]);

        let records = store
            .get_duty_time_records("crew_001", date(2025, 3, 5), date(2025, 3, 10))
            .await
            .unwrap();

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
    }

    #[tokio::test]
    async fn test_active_members_filter_by_category_and_status() {
        let store = InMemoryStore::new()
            .with_crew_member(create_crew("p1", CrewCategory::Pilot, CrewStatus::Active))
            .with_crew_member(create_crew("p2", CrewCategory::Pilot, CrewStatus::OnLeave))
            .with_crew_member(create_crew(
                "f1",
                CrewCategory::FlightAttendant,
                CrewStatus::Active,
            ));

        let pilots = store
            .get_active_crew_members(CrewCategory::Pilot)
            .await
            .unwrap();
        assert_eq!(pilots.len(), 1);
        assert_eq!(pilots[0].id, "p1");
    }

    #[tokio::test]
    async fn test_failure_injection_only_affects_named_crew() {
        let store = InMemoryStore::new()
            .with_crew_member(create_crew("p1", CrewCategory::Pilot, CrewStatus::Active))
            .with_crew_member(create_crew("p2", CrewCategory::Pilot, CrewStatus::Active))
            .fail_reads_for("p1");

        let err = store.get_crew_member("p1").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
        assert!(store.get_crew_member("E-p1").await.is_err());
        assert!(store.get_crew_member("p2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_crew_is_none() {
        let store = InMemoryStore::new();
        assert!(store.get_crew_member("nobody").await.unwrap().is_none());
        assert!(store.get_medical_certificate("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshots_are_recorded_in_order() {
        let store = InMemoryStore::new();
        for crew_id in ["p1", "p2"] {
            store
                .record_compliance_snapshot(ComplianceSnapshot {
                    snapshot_id: uuid::Uuid::nil(),
                    crew_id: crew_id.to_string(),
                    as_of_date: date(2025, 3, 31),
                    flight_hours_28_days: rust_decimal::Decimal::ZERO,
                    flight_hours_365_days: rust_decimal::Decimal::ZERO,
                    rest_compliance: true,
                    fdp_compliance: true,
                    alert_count: 0,
                })
                .await
                .unwrap();
        }

        let crew_ids: Vec<String> = store
            .snapshots()
            .await
            .into_iter()
            .map(|s| s.crew_id)
            .collect();
        assert_eq!(crew_ids, vec!["p1", "p2"]);
    }
}
