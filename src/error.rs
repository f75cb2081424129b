//! Error types for the crew rules engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the legality, compliance and pay engines can surface.
//! Missing pay rules are deliberately *not* errors: they are reported as
//! audit warnings and the affected component defaults to zero.

use chrono::NaiveDate;
use thiserror::Error;

use crate::store::StoreError;

/// The main error type for the crew rules engine.
///
/// Single-crew operations return this error to their caller. Bulk
/// operations log it and omit the affected crew member from their output.
///
/// # Example
///
/// ```
/// use crew_rules_engine::error::EngineError;
///
/// let error = EngineError::CrewNotFound {
///     crew_id: "crew_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Crew member not found: crew_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but is not usable (empty table, bad ceiling...).
    #[error("Invalid rule set configuration: {message}")]
    InvalidConfig {
        /// A description of what is wrong with the configuration.
        message: String,
    },

    /// The crew identifier does not resolve to a crew record.
    #[error("Crew member not found: {crew_id}")]
    CrewNotFound {
        /// The identifier that was looked up.
        crew_id: String,
    },

    /// A duty record read from the store violates its invariants.
    #[error("Invalid duty record '{duty_id}': {message}")]
    InvalidDutyRecord {
        /// The ID of the invalid duty record.
        duty_id: String,
        /// A description of what made the record invalid.
        message: String,
    },

    /// A proposed duty that cannot be flown as described.
    #[error("Invalid proposed assignment: {message}")]
    InvalidAssignment {
        /// A description of what made the proposal invalid.
        message: String,
    },

    /// A pay period whose end precedes its start.
    #[error("Invalid pay period: end {end} is before start {start}")]
    InvalidPeriod {
        /// The period start date.
        start: NaiveDate,
        /// The period end date.
        end: NaiveDate,
    },

    /// The external store failed to serve a read or write.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Returns true if this error means the crew member does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::CrewNotFound { .. })
    }
}
