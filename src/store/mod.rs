//! Read/write contract for crew records, duty history and pay rules.
//!
//! The engine never owns persistence; everything it knows about crew comes
//! through a [`CrewDataStore`]. [`InMemoryStore`] is the bundled
//! implementation used by tests, benchmarks and embedders that already hold
//! their data in memory.

mod memory;

pub use memory::InMemoryStore;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    AircraftTypeRating, ComplianceSnapshot, CrewCategory, CrewMember, DutyTimeRecord,
    MedicalCertificate, PayRuleDefinition, TrainingRecord,
};

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    #[error("malformed {entity} data: {message}")]
    Malformed { entity: String, message: String },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Everything the engine reads from, and writes to, the crew record store.
///
/// Lookups that may legitimately miss return `Option`; an `Err` always
/// means the store itself failed.
#[allow(async_fn_in_trait)]
pub trait CrewDataStore {
    /// Looks up a crew member by id or employee number.
    async fn get_crew_member(&self, identifier: &str) -> StoreResult<Option<CrewMember>>;

    /// All ACTIVE crew members of a category.
    async fn get_active_crew_members(
        &self,
        category: CrewCategory,
    ) -> StoreResult<Vec<CrewMember>>;

    /// Duty records with `from <= duty_date <= to`, ordered by start time.
    async fn get_duty_time_records(
        &self,
        crew_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<DutyTimeRecord>>;

    async fn get_aircraft_type_ratings(
        &self,
        crew_id: &str,
    ) -> StoreResult<Vec<AircraftTypeRating>>;

    async fn get_medical_certificate(
        &self,
        crew_id: &str,
    ) -> StoreResult<Option<MedicalCertificate>>;

    async fn get_training_records(&self, crew_id: &str) -> StoreResult<Vec<TrainingRecord>>;

    /// Candidate pay rules for a crew type.
    ///
    /// `position` and `effective_date` narrow the result when given. The
    /// engine applies the exact applicability window itself, so a store may
    /// return a superset.
    async fn get_pay_calculation_rules(
        &self,
        crew_type: CrewCategory,
        position: Option<&str>,
        effective_date: Option<NaiveDate>,
    ) -> StoreResult<Vec<PayRuleDefinition>>;

    async fn record_compliance_snapshot(&self, snapshot: ComplianceSnapshot) -> StoreResult<()>;
}
