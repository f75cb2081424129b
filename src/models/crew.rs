//! Crew member model and related types.
//!
//! Crew records are owned by the external record store; the engine only
//! reads them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rolling::whole_years_between;

/// The crew category, which selects both the regulatory and pay rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrewCategory {
    /// Flight deck crew (captains, first officers).
    Pilot,
    /// Cabin crew.
    FlightAttendant,
}

impl CrewCategory {
    /// Returns the wire code used in rule tables (e.g. `"PILOT"`).
    pub fn code(&self) -> &'static str {
        match self {
            CrewCategory::Pilot => "PILOT",
            CrewCategory::FlightAttendant => "FLIGHT_ATTENDANT",
        }
    }
}

impl std::fmt::Display for CrewCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Employment status of a crew member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrewStatus {
    /// Available for assignment.
    Active,
    /// Not currently flying.
    Inactive,
    /// On approved leave.
    OnLeave,
    /// No longer employed.
    Terminated,
}

/// Represents a crew member as held by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Unique identifier for the crew member.
    pub id: String,
    /// Airline employee number (also accepted as a lookup identifier).
    pub employee_number: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Pilot or flight attendant.
    pub category: CrewCategory,
    /// Position code (e.g. "CAPTAIN", "FIRST_OFFICER", "PURSER").
    pub position: String,
    /// Home base airport code.
    pub base: String,
    /// The date the crew member was hired.
    pub hire_date: NaiveDate,
    /// Current employment status.
    pub status: CrewStatus,
}

impl CrewMember {
    /// Returns the crew member's display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if the crew member can be assigned or monitored.
    pub fn is_active(&self) -> bool {
        self.status == CrewStatus::Active
    }

    /// Whole years of service completed on `as_of`.
    ///
    /// # Examples
    ///
    /// ```
    /// use crew_rules_engine::models::{CrewCategory, CrewMember, CrewStatus};
    /// use chrono::NaiveDate;
    ///
    /// let crew = CrewMember {
    ///     id: "crew_001".to_string(),
    ///     employee_number: "P1001".to_string(),
    ///     first_name: "Ada".to_string(),
    ///     last_name: "Okafor".to_string(),
    ///     category: CrewCategory::Pilot,
    ///     position: "CAPTAIN".to_string(),
    ///     base: "ORD".to_string(),
    ///     hire_date: NaiveDate::from_ymd_opt(2015, 6, 15).unwrap(),
    ///     status: CrewStatus::Active,
    /// };
    ///
    /// assert_eq!(crew.years_of_service(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()), 9);
    /// assert_eq!(crew.years_of_service(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()), 10);
    /// ```
    pub fn years_of_service(&self, as_of: NaiveDate) -> u32 {
        whole_years_between(self.hire_date, as_of)
    }
}
