//! Rule set configuration for the crew rules engine.
//!
//! This module loads the regulatory and pay rule tables from YAML files.
//! A rule set is loaded once at startup and shared immutably.
//!
//! # Example
//!
//! ```no_run
//! use crew_rules_engine::config::RuleSetLoader;
//!
//! let rule_set = RuleSetLoader::load("./config/default").unwrap();
//! println!("Loaded rule set: {}", rule_set.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::RuleSetLoader;
pub use types::{
    AlertThresholds, FdpLimits, FlatPremium, LongevityConfig, LongevityTier, MultiplierPremium,
    OvertimeConfig, PayRulesConfig, PerDiemConfig, PremiumsConfig, RegulatoryConfig, RestRules,
    RestTier, RollingLimits, RuleSet, RuleSetMetadata,
};

/// The rule set shipped in `config/default`, for unit tests.
#[cfg(test)]
pub(crate) fn default_rule_set() -> RuleSet {
    RuleSetLoader::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default"))
        .expect("default rule set loads")
}
