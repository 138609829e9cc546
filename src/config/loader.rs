//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax-year
//! configurations from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{
    BracketsConfig, CreditSchedule, CreditsConfig, EligibilityProfile, RulingConfig, TaxBracket,
    TaxYearConfig, TaxYearMetadata,
};

/// Loads and provides access to a tax-year configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// validates their structure, and provides methods to query brackets,
/// credits, ruling tiers and eligibility profiles.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/nl-2025/
/// ├── tax_year.yaml   # Tax-year metadata
/// ├── brackets.yaml   # Progressive income tax brackets
/// ├── credits.yaml    # Labor and general credit schedules
/// └── ruling.yaml     # Ruling tiers, window and eligibility profiles
/// ```
///
/// # Example
///
/// ```no_run
/// use nl_income_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/nl-2025").unwrap();
///
/// let profile = loader.eligibility_profile(None).unwrap();
/// println!("Salary cap: {}", profile.salary_cap);
///
/// let rate = loader.tier_rate(2027).unwrap();
/// println!("Relief in 2027: {}", rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: TaxYearConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/nl-2025")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The loaded values violate a structural rule (see [`ConfigLoader::from_config`])
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<TaxYearMetadata>(&path.join("tax_year.yaml"))?;
        let brackets = Self::load_yaml::<BracketsConfig>(&path.join("brackets.yaml"))?;
        let credits = Self::load_yaml::<CreditsConfig>(&path.join("credits.yaml"))?;
        let ruling = Self::load_yaml::<RulingConfig>(&path.join("ruling.yaml"))?;

        let config = TaxYearConfig::new(
            metadata,
            brackets.brackets,
            credits.labor_credit,
            credits.general_credit,
            ruling,
        );

        debug!(path = %path.display(), code = %config.metadata().code, "Loaded tax-year configuration");
        Self::from_config(config)
    }

    /// Wraps a programmatically built configuration, applying the same
    /// validation as [`ConfigLoader::load`].
    ///
    /// Rejected when:
    /// - brackets or credit phases are empty, not strictly ascending, or
    ///   unbounded anywhere but in the last position
    /// - a bracket rate is outside (0, 1)
    /// - ruling tiers are empty, share a year, or rise in rate over time
    /// - `window_years` is zero
    /// - a profile holds a negative amount, or the default profile is missing
    pub fn from_config(config: TaxYearConfig) -> EngineResult<Self> {
        Self::validate_brackets(config.brackets())?;
        Self::validate_schedule("labor_credit", config.labor_credit())?;
        Self::validate_schedule("general_credit", config.general_credit())?;
        Self::validate_ruling(config.ruling())?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_bounds(name: &str, bounds: &[Option<Decimal>]) -> EngineResult<()> {
        let Some((last, rest)) = bounds.split_last() else {
            return Err(EngineError::invalid_config(format!("{name} must not be empty")));
        };
        if last.is_some() {
            return Err(EngineError::invalid_config(format!(
                "the last entry of {name} must be unbounded"
            )));
        }

        let mut previous = Decimal::ZERO;
        for (index, bound) in rest.iter().enumerate() {
            let Some(bound) = *bound else {
                return Err(EngineError::invalid_config(format!(
                    "{name}[{index}] is unbounded but is not the last entry"
                )));
            };
            if bound <= previous {
                return Err(EngineError::invalid_config(format!(
                    "{name}[{index}] upper bound {bound} must be greater than {previous}"
                )));
            }
            previous = bound;
        }
        Ok(())
    }

    fn validate_brackets(brackets: &[TaxBracket]) -> EngineResult<()> {
        let bounds: Vec<_> = brackets.iter().map(|b| b.upper_bound).collect();
        Self::validate_bounds("brackets", &bounds)?;

        if let Some(bracket) = brackets
            .iter()
            .find(|b| b.rate <= Decimal::ZERO || b.rate >= Decimal::ONE)
        {
            return Err(EngineError::invalid_config(format!(
                "bracket rate {} must be between 0 and 1",
                bracket.rate
            )));
        }
        Ok(())
    }

    fn validate_schedule(name: &str, schedule: &CreditSchedule) -> EngineResult<()> {
        let bounds: Vec<_> = schedule.phases.iter().map(|p| p.upper_bound).collect();
        Self::validate_bounds(name, &bounds)
    }

    fn validate_ruling(ruling: &RulingConfig) -> EngineResult<()> {
        if ruling.tiers.is_empty() {
            return Err(EngineError::invalid_config("ruling tiers must not be empty"));
        }
        for tier in &ruling.tiers {
            if tier.rate <= Decimal::ZERO || tier.rate > Decimal::ONE {
                return Err(EngineError::invalid_config(format!(
                    "ruling tier {} rate {} must be in (0, 1]",
                    tier.from_year, tier.rate
                )));
            }
        }
        for pair in ruling.tiers.windows(2) {
            if pair[1].from_year <= pair[0].from_year {
                return Err(EngineError::invalid_config(format!(
                    "ruling tier year {} is declared twice",
                    pair[1].from_year
                )));
            }
            if pair[1].rate > pair[0].rate {
                return Err(EngineError::invalid_config(format!(
                    "ruling tier {} rate {} exceeds the earlier rate {}",
                    pair[1].from_year, pair[1].rate, pair[0].rate
                )));
            }
        }

        if ruling.window_years == 0 {
            return Err(EngineError::invalid_config("window_years must be at least 1"));
        }

        for (name, profile) in &ruling.eligibility_profiles {
            if profile.senior_threshold < Decimal::ZERO
                || profile.junior_threshold < Decimal::ZERO
                || profile.salary_cap < Decimal::ZERO
            {
                return Err(EngineError::invalid_config(format!(
                    "eligibility profile '{name}' contains a negative amount"
                )));
            }
        }
        if !ruling
            .eligibility_profiles
            .contains_key(&ruling.default_profile)
        {
            return Err(EngineError::invalid_config(format!(
                "default profile '{}' is not defined",
                ruling.default_profile
            )));
        }
        Ok(())
    }

    /// Returns the underlying tax-year configuration.
    pub fn config(&self) -> &TaxYearConfig {
        &self.config
    }

    /// Returns the tax-year metadata.
    pub fn metadata(&self) -> &TaxYearMetadata {
        self.config.metadata()
    }

    /// Returns the name of the profile used when none is requested.
    pub fn default_profile_name(&self) -> &str {
        &self.config.ruling().default_profile
    }

    /// Gets an eligibility profile by name, or the default profile for `None`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nl_income_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/nl-2025")?;
    /// let profile = loader.eligibility_profile(Some("taxable_salary"))?;
    /// println!("Senior threshold: {}", profile.senior_threshold);
    /// # Ok::<(), nl_income_engine::error::EngineError>(())
    /// ```
    pub fn eligibility_profile(&self, name: Option<&str>) -> EngineResult<&EligibilityProfile> {
        let name = name.unwrap_or_else(|| self.default_profile_name());
        self.config
            .ruling()
            .eligibility_profiles
            .get(name)
            .ok_or_else(|| EngineError::EligibilityProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Gets the relief rate of the ruling for an absolute calendar year.
    ///
    /// The most recent tier starting on or before `year` applies.
    pub fn tier_rate(&self, year: i32) -> EngineResult<Decimal> {
        self.config.ruling().tier_rate(year).ok_or_else(|| {
            EngineError::invalid_input(
                "ruling_start_date",
                format!("no ruling tier is configured for {year}"),
            )
        })
    }

    /// Returns the length of the relief window in years.
    pub fn window_years(&self) -> u32 {
        self.config.ruling().window_years
    }
}
