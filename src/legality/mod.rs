//! Crew legality validation.
//!
//! A proposed duty is legal for a crew member when they are qualified on
//! type, have rested long enough since their previous duty, the flight duty
//! period fits the FDP table, and the projected rolling flight time stays
//! within both ceilings. Each check is a pure function over data already
//! read from the store; [`LegalityValidator`] does the reading and combines
//! the results.

mod fdp;
mod qualification;
mod recommendations;
mod rest;
mod rolling_limits;
mod validator;

pub use fdp::check_fdp_limits;
pub use qualification::check_qualifications;
pub use recommendations::{ALL_CHECKS_PASSED, build_recommendations};
pub use rest::check_rest;
pub use rolling_limits::check_rolling_limits;
pub use validator::LegalityValidator;
