//! Configuration loading and management for the Disposable Income Projection Engine.
//!
//! This module provides functionality to load a tax-year configuration from YAML files,
//! including the progressive brackets, the two credit schedules, the ruling tiers and
//! the candidate eligibility profiles.
//!
//! # Example
//!
//! ```no_run
//! use nl_income_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/nl-2025").unwrap();
//! println!("Loaded tax year: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CreditFormula, CreditPhase, CreditSchedule, EligibilityProfile, RulingConfig, RulingTier,
    TaxBracket, TaxYearConfig, TaxYearMetadata,
};
