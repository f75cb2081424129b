//! Core data models for the crew rules engine.
//!
//! This module contains all the domain models used throughout the engine.

mod compliance;
mod crew;
mod duty;
mod legality;
mod pay_calculation;
mod pay_period;
mod pay_rule;
mod qualification;

pub use compliance::{
    AlertType, AssignmentClearance, ComplianceAlert, ComplianceReport, ComplianceSnapshot,
    RollingWindow,
};
pub use crew::{CrewCategory, CrewMember, CrewStatus};
pub use duty::{DEFAULT_ESTIMATED_FLIGHT_MINUTES, DutyTimeRecord, ProposedDutyAssignment};
pub use legality::{
    DutyLimitCheck, FdpLimitCheck, LegalityResult, QualificationIssue, QualificationIssueType,
    ReportTimeBucket, RestCompliance, RollingLimitCheck, SegmentBucket, Severity,
};
pub use pay_calculation::{
    AppliedRule, AuditStep, AuditTrace, AuditWarning, DutySummary, PayBreakdown, PayCalculation,
    PayComponent, PayContext, PeriodTotals,
};
pub use pay_period::{PayPeriod, PublicHoliday, is_public_holiday};
pub use pay_rule::{PayRuleDefinition, PayRuleType};
pub use qualification::{
    AircraftTypeRating, CurrencyStatus, License, MedicalCertificate, MedicalStatus,
    TrainingRecord, TrainingStatus,
};
