//! Crew Rules Engine for airline crew scheduling and payroll
//!
//! This crate decides whether a crew member may legally take a proposed
//! duty (qualifications, rest, flight duty period limits and rolling
//! flight-time ceilings), monitors rolling flight-time compliance across the
//! active crew, and computes crew compensation from recorded duty under a
//! collective agreement's pay rules.
//!
//! Regulatory and pay tables are loaded once from YAML by
//! [`config::RuleSetLoader`]; crew data is read through the
//! [`store::CrewDataStore`] trait. [`CrewRulesEngine`] ties both together.

pub mod compliance;
pub mod config;
pub mod engine;
pub mod error;
pub mod legality;
pub mod models;
pub mod pay;
pub mod rolling;
pub mod store;

pub use engine::CrewRulesEngine;
pub use error::{EngineError, EngineResult};
