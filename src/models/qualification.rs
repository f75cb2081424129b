//! Qualification records: type ratings, medicals and recurrent training.
//!
//! Currency and status values are computed by the record store and trusted
//! as given.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Currency of an aircraft type rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurrencyStatus {
    /// Current and usable.
    Current,
    /// Still current, lapses soon.
    ExpiringSoon,
    /// No longer current.
    Expired,
}

/// Status of a medical certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicalStatus {
    /// Valid.
    Valid,
    /// Valid, expires soon.
    ExpiringSoon,
    /// Expired.
    Expired,
}

impl std::fmt::Display for MedicalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MedicalStatus::Valid => "VALID",
            MedicalStatus::ExpiringSoon => "EXPIRING_SOON",
            MedicalStatus::Expired => "EXPIRED",
        };
        f.write_str(label)
    }
}

/// Status of a recurrent training item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainingStatus {
    /// Completed within its interval.
    Current,
    /// Due within the grace window.
    DueSoon,
    /// Past due.
    Overdue,
}

/// A pilot or crew license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// The crew member holding the license.
    pub crew_id: String,
    /// License number as issued.
    pub license_number: String,
    /// License type (e.g. "ATP", "COMMERCIAL").
    pub license_type: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Expiry date; `None` for licenses that do not lapse.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

impl License {
    /// Whether the license is usable on `date`.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.issue_date <= date && self.expiry_date.is_none_or(|exp| date <= exp)
    }
}

/// Authorization to operate a specific aircraft type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftTypeRating {
    /// The crew member holding the rating.
    pub crew_id: String,
    /// Aircraft type code (e.g. "B737").
    pub aircraft_type: String,
    /// Currency of the rating.
    pub currency_status: CurrencyStatus,
    /// Last date the rating was exercised or checked.
    #[serde(default)]
    pub last_check_date: Option<NaiveDate>,
}

/// A medical certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalCertificate {
    /// The crew member holding the certificate.
    pub crew_id: String,
    /// Medical class (e.g. "FIRST").
    pub medical_class: String,
    /// Status of the certificate.
    pub status: MedicalStatus,
    /// Expiry date.
    pub expiry_date: NaiveDate,
}

/// A recurrent training item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// The crew member the training belongs to.
    pub crew_id: String,
    /// Training type (e.g. "RECURRENT_GROUND", "EMERGENCY_PROCEDURES").
    pub training_type: String,
    /// Status of the item.
    pub status: TrainingStatus,
    /// When the item is next due.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}
