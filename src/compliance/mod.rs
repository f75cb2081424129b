//! Continuous compliance monitoring.
//!
//! Grades rolling flight-time totals against their ceilings, sweeps the
//! active pilot population recording a snapshot per crew member, and offers
//! a fast "clear to assign N hours" pre-check.

mod alerts;
mod monitor;

pub use alerts::{grade_alerts, grade_window};
pub use monitor::ComplianceMonitor;
