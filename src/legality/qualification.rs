//! Qualification currency check.
//!
//! A crew member may only fly an aircraft type they hold a current rating
//! for, with a valid medical and no overdue recurrent training. Status values
//! come from the record store and are trusted as given.

use crate::models::{
    AircraftTypeRating, CurrencyStatus, MedicalCertificate, MedicalStatus, QualificationIssue,
    QualificationIssueType, Severity, TrainingRecord, TrainingStatus,
};

/// Checks a crew member's qualifications for the proposed aircraft type.
///
/// # Arguments
///
/// * `aircraft_type` - Aircraft type of the proposed duty (e.g. "B737")
/// * `ratings` - The crew member's type ratings
/// * `medical` - The crew member's medical certificate, if any
/// * `training` - The crew member's recurrent training items
///
/// # Returns
///
/// One issue per failed qualification, in the order type rating, medical,
/// training. An empty list means the crew member is qualified.
///
/// - No CURRENT rating for `aircraft_type` (matched case-insensitively):
///   CRITICAL. EXPIRING_SOON does not count as current.
/// - Medical absent or not VALID: CRITICAL, naming the current status.
/// - Any OVERDUE training: a single HIGH issue carrying the count.
///
/// # Examples
///
/// ```
/// use crew_rules_engine::legality::check_qualifications;
/// use crew_rules_engine::models::{QualificationIssueType, Severity};
///
/// let issues = check_qualifications("B737", &[], None, &[]);
///
/// assert_eq!(issues.len(), 2);
/// assert_eq!(issues[0].issue_type, QualificationIssueType::TypeRating);
/// assert_eq!(issues[1].issue_type, QualificationIssueType::Medical);
/// assert!(issues.iter().all(|i| i.severity == Severity::Critical));
/// ```
pub fn check_qualifications(
    aircraft_type: &str,
    ratings: &[AircraftTypeRating],
    medical: Option<&MedicalCertificate>,
    training: &[TrainingRecord],
) -> Vec<QualificationIssue> {
    let mut issues = Vec::new();

    let has_current_rating = ratings.iter().any(|r| {
        r.aircraft_type.eq_ignore_ascii_case(aircraft_type)
            && r.currency_status == CurrencyStatus::Current
    });
    if !has_current_rating {
        issues.push(QualificationIssue {
            issue_type: QualificationIssueType::TypeRating,
            severity: Severity::Critical,
            description: format!("No current type rating for {aircraft_type}"),
        });
    }

    match medical {
        Some(cert) if cert.status == MedicalStatus::Valid => {}
        Some(cert) => issues.push(QualificationIssue {
            issue_type: QualificationIssueType::Medical,
            severity: Severity::Critical,
            description: format!(
                "Medical certificate is {} (expires {})",
                cert.status, cert.expiry_date
            ),
        }),
        None => issues.push(QualificationIssue {
            issue_type: QualificationIssueType::Medical,
            severity: Severity::Critical,
            description: "No medical certificate on file".to_string(),
        }),
    }

    let overdue = training
        .iter()
        .filter(|t| t.status == TrainingStatus::Overdue)
        .count();
    if overdue > 0 {
        issues.push(QualificationIssue {
            issue_type: QualificationIssueType::Training,
            severity: Severity::High,
            description: format!("{overdue} training item(s) overdue"),
        });
    }

    issues
}
