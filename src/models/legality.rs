//! Legality result models.
//!
//! This module contains [`LegalityResult`] and the sub-results produced by
//! each stage of the legality validator, plus the report-time and segment
//! buckets that key the flight duty period table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Severity grade shared by qualification issues and compliance alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informational.
    Low,
    /// Needs attention soon.
    Medium,
    /// Needs attention before the next assignment.
    High,
    /// Blocks assignment.
    Critical,
}

/// The kind of qualification problem found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualificationIssueType {
    /// No current type rating for the proposed aircraft type.
    TypeRating,
    /// Medical certificate missing or not valid.
    Medical,
    /// One or more training items overdue.
    Training,
}

/// A single qualification problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationIssue {
    /// What kind of qualification failed.
    pub issue_type: QualificationIssueType,
    /// How serious the problem is.
    pub severity: Severity,
    /// Human-readable description.
    pub description: String,
}

/// Outcome of the rest requirement check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestCompliance {
    /// Whether the crew member has had enough rest.
    pub is_compliant: bool,
    /// Hours between the previous release and the proposed report.
    /// `None` when there is no previous duty (unbounded rest).
    pub hours_since_rest: Option<Decimal>,
    /// Minimum rest required before the proposed duty.
    pub required_rest_hours: Decimal,
    /// The previous duty the rest was measured from.
    pub previous_duty_id: Option<String>,
    /// Flight duty period of the previous duty, in hours.
    pub previous_fdp_hours: Option<Decimal>,
    /// Violation messages; empty when compliant.
    pub violations: Vec<String>,
}

impl RestCompliance {
    /// Hours of rest still needed before the duty can start.
    pub fn hours_short(&self) -> Decimal {
        match self.hours_since_rest {
            Some(elapsed) if elapsed < self.required_rest_hours => {
                self.required_rest_hours - elapsed
            }
            Some(_) => Decimal::ZERO,
            None if self.is_compliant => Decimal::ZERO,
            None => self.required_rest_hours,
        }
    }
}

/// Report-time bucket of the flight duty period table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReportTimeBucket {
    /// 00:00-03:59.
    #[serde(rename = "0000-0359")]
    H0000To0359,
    /// 04:00-04:59.
    #[serde(rename = "0400-0459")]
    H0400To0459,
    /// 05:00-05:59.
    #[serde(rename = "0500-0559")]
    H0500To0559,
    /// 06:00-06:59.
    #[serde(rename = "0600-0659")]
    H0600To0659,
    /// 07:00-11:59.
    #[serde(rename = "0700-1159")]
    H0700To1159,
    /// 12:00-12:59.
    #[serde(rename = "1200-1259")]
    H1200To1259,
    /// 13:00-16:59.
    #[serde(rename = "1300-1659")]
    H1300To1659,
    /// 17:00-23:59.
    #[serde(rename = "1700-2359")]
    H1700To2359,
}

impl ReportTimeBucket {
    /// Classifies an hour of day (0-23) into its bucket.
    ///
    /// # Examples
    ///
    /// ```
    /// use crew_rules_engine::models::ReportTimeBucket;
    ///
    /// assert_eq!(ReportTimeBucket::from_hour(6), ReportTimeBucket::H0600To0659);
    /// assert_eq!(ReportTimeBucket::from_hour(6).label(), "0600-0659");
    /// assert_eq!(ReportTimeBucket::from_hour(23), ReportTimeBucket::H1700To2359);
    /// ```
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=3 => ReportTimeBucket::H0000To0359,
            4 => ReportTimeBucket::H0400To0459,
            5 => ReportTimeBucket::H0500To0559,
            6 => ReportTimeBucket::H0600To0659,
            7..=11 => ReportTimeBucket::H0700To1159,
            12 => ReportTimeBucket::H1200To1259,
            13..=16 => ReportTimeBucket::H1300To1659,
            _ => ReportTimeBucket::H1700To2359,
        }
    }

    /// The table label of the bucket (e.g. `"0600-0659"`).
    pub fn label(&self) -> &'static str {
        match self {
            ReportTimeBucket::H0000To0359 => "0000-0359",
            ReportTimeBucket::H0400To0459 => "0400-0459",
            ReportTimeBucket::H0500To0559 => "0500-0559",
            ReportTimeBucket::H0600To0659 => "0600-0659",
            ReportTimeBucket::H0700To1159 => "0700-1159",
            ReportTimeBucket::H1200To1259 => "1200-1259",
            ReportTimeBucket::H1300To1659 => "1300-1659",
            ReportTimeBucket::H1700To2359 => "1700-2359",
        }
    }
}

/// Segment-count bucket of the flight duty period table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SegmentBucket {
    /// One segment (or none recorded).
    #[serde(rename = "1_segment")]
    One,
    /// Two segments.
    #[serde(rename = "2_segments")]
    Two,
    /// Three segments.
    #[serde(rename = "3_segments")]
    Three,
    /// Four segments.
    #[serde(rename = "4_segments")]
    Four,
    /// Five segments.
    #[serde(rename = "5_segments")]
    Five,
    /// Six or more segments.
    #[serde(rename = "6_plus_segments")]
    SixPlus,
}

impl SegmentBucket {
    /// Classifies a segment count into its bucket.
    pub fn from_count(segments: u32) -> Self {
        match segments {
            0 | 1 => SegmentBucket::One,
            2 => SegmentBucket::Two,
            3 => SegmentBucket::Three,
            4 => SegmentBucket::Four,
            5 => SegmentBucket::Five,
            _ => SegmentBucket::SixPlus,
        }
    }

    /// The table label of the bucket (e.g. `"2_segments"`).
    pub fn label(&self) -> &'static str {
        match self {
            SegmentBucket::One => "1_segment",
            SegmentBucket::Two => "2_segments",
            SegmentBucket::Three => "3_segments",
            SegmentBucket::Four => "4_segments",
            SegmentBucket::Five => "5_segments",
            SegmentBucket::SixPlus => "6_plus_segments",
        }
    }
}

/// Outcome of the flight duty period limit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FdpLimitCheck {
    /// Whether the proposed FDP is within the table maximum.
    pub is_compliant: bool,
    /// Proposed FDP in hours.
    pub proposed_fdp_hours: Decimal,
    /// Maximum FDP allowed for the segment/report-time combination.
    pub max_fdp_hours: Decimal,
    /// Segment bucket used for the lookup.
    pub segment_bucket: SegmentBucket,
    /// Report-time bucket used for the lookup.
    pub report_time_bucket: ReportTimeBucket,
    /// False when the table had no cell and the default maximum was used.
    pub table_match: bool,
    /// Violation messages; empty when compliant.
    pub violations: Vec<String>,
}

/// Outcome of the rolling flight-hour limit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingLimitCheck {
    /// Recorded flight hours in the trailing 28 days.
    pub hours_28_days: Decimal,
    /// Recorded flight hours in the trailing 365 days.
    pub hours_365_days: Decimal,
    /// Flight hours the proposed duty adds.
    pub proposed_flight_hours: Decimal,
    /// 28-day total including the proposed duty.
    pub projected_28_days: Decimal,
    /// 365-day total including the proposed duty.
    pub projected_365_days: Decimal,
    /// 28-day ceiling.
    pub limit_28_days: Decimal,
    /// 365-day ceiling.
    pub limit_365_days: Decimal,
    /// Whether the 28-day projection is within its ceiling.
    pub is_compliant_28_days: bool,
    /// Whether the 365-day projection is within its ceiling.
    pub is_compliant_365_days: bool,
    /// Violation messages; empty when compliant.
    pub violations: Vec<String>,
}

impl RollingLimitCheck {
    /// Whether both windows are within their ceilings.
    pub fn is_compliant(&self) -> bool {
        self.is_compliant_28_days && self.is_compliant_365_days
    }
}

/// Combined duty limit sub-result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyLimitCheck {
    /// Flight duty period check.
    pub fdp: FdpLimitCheck,
    /// Rolling flight-hour check.
    pub rolling: RollingLimitCheck,
    /// Consecutive duty days immediately before the proposed date.
    pub consecutive_duty_days: u32,
}

impl DutyLimitCheck {
    /// Whether both the FDP and rolling checks passed.
    pub fn is_compliant(&self) -> bool {
        self.fdp.is_compliant && self.rolling.is_compliant()
    }

    /// All duty limit violations.
    pub fn violations(&self) -> Vec<String> {
        self.fdp
            .violations
            .iter()
            .chain(self.rolling.violations.iter())
            .cloned()
            .collect()
    }
}

/// The complete legality verdict for one crew member and proposed duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalityResult {
    /// The crew member evaluated.
    pub crew_id: String,
    /// Aircraft type of the proposed duty.
    pub aircraft_type: String,
    /// Proposed report time.
    pub proposed_start: DateTime<Utc>,
    /// Overall verdict.
    pub is_legal: bool,
    /// Qualification problems found.
    pub qualification_issues: Vec<QualificationIssue>,
    /// Rest requirement sub-result.
    pub rest_compliance: RestCompliance,
    /// Duty limit sub-result.
    pub duty_limits: DutyLimitCheck,
    /// Remedies and warnings, one line per finding.
    pub recommendations: Vec<String>,
}
