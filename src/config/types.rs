//! Configuration types for a Dutch tax year.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every number the
//! calculations depend on lives here; the calculation bodies never carry
//! their own constants.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata about the tax year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxYearMetadata {
    /// Short identifier of this configuration (e.g., "nl-2025").
    pub code: String,
    /// The human-readable name.
    pub name: String,
    /// The calendar year whose rates these are.
    pub year: i32,
    /// URL to the official rate publication.
    pub source_url: String,
}

/// One bracket of the progressive income tax.
///
/// `upper_bound` of `None` means the bracket is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound of the bracket.
    #[serde(default)]
    pub upper_bound: Option<Decimal>,
    /// Marginal rate applied to income inside the bracket.
    pub rate: Decimal,
}

/// Brackets configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct BracketsConfig {
    /// Brackets sorted ascending by upper bound.
    pub brackets: Vec<TaxBracket>,
}

/// How a credit phase turns a salary into a credit amount.
///
/// Build-up and phase-out formulas are measured from the lower bound of
/// their phase, which is the previous phase's upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreditFormula {
    /// No credit in this phase.
    FlatZero,
    /// `(salary - lower_bound) * rate`, optionally capped at `max_amount`.
    LinearBuildup {
        /// Build-up rate.
        rate: Decimal,
        /// Optional ceiling, normally the plateau of the next phase.
        #[serde(default)]
        max_amount: Option<Decimal>,
    },
    /// A fixed credit.
    FlatPlateau {
        /// The credit amount.
        amount: Decimal,
    },
    /// `from_amount - (salary - lower_bound) * rate`, floored at zero.
    LinearPhaseout {
        /// Credit at the lower bound of the phase.
        from_amount: Decimal,
        /// Phase-out rate.
        rate: Decimal,
    },
}

/// A contiguous salary range of a credit schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPhase {
    /// Inclusive upper bound of the phase, `None` for unbounded.
    #[serde(default)]
    pub upper_bound: Option<Decimal>,
    /// The formula applied within the phase.
    pub formula: CreditFormula,
}

/// An ordered sequence of credit phases covering `[0, +inf)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditSchedule {
    /// Phases sorted ascending by upper bound.
    pub phases: Vec<CreditPhase>,
}

/// Credits configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsConfig {
    /// The labor credit (arbeidskorting).
    pub labor_credit: CreditSchedule,
    /// The general credit (algemene heffingskorting).
    pub general_credit: CreditSchedule,
}

/// A relief tier of the ruling, effective from an absolute calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulingTier {
    /// First calendar year this rate applies to.
    pub from_year: i32,
    /// Fraction of salary exempted from tax.
    pub rate: Decimal,
}

/// Salary thresholds and cap that decide eligibility for the ruling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityProfile {
    /// Minimum gross salary for employees aged 30 or over.
    pub senior_threshold: Decimal,
    /// Minimum gross salary for employees under 30 with a qualifying credential.
    pub junior_threshold: Decimal,
    /// Salary above which the ruling base is clamped.
    pub salary_cap: Decimal,
}

/// Ruling configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulingConfig {
    /// Relief tiers sorted ascending by `from_year`.
    pub tiers: Vec<RulingTier>,
    /// Length of the relief window in years.
    pub window_years: u32,
    /// Name of the profile used when a request does not pick one.
    pub default_profile: String,
    /// Candidate eligibility profiles by name.
    pub eligibility_profiles: BTreeMap<String, EligibilityProfile>,
}

impl RulingConfig {
    /// Returns the relief rate for an absolute calendar year, taken from the
    /// latest tier starting on or before it.
    pub fn tier_rate(&self, year: i32) -> Option<Decimal> {
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.from_year <= year)
            .map(|tier| tier.rate)
    }
}

/// The complete tax-year configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a tax-year configuration directory.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxYearConfig {
    /// Tax-year metadata.
    metadata: TaxYearMetadata,
    /// Progressive tax brackets.
    brackets: Vec<TaxBracket>,
    /// Labor credit schedule.
    labor_credit: CreditSchedule,
    /// General credit schedule.
    general_credit: CreditSchedule,
    /// Ruling tiers, window and eligibility profiles.
    ruling: RulingConfig,
}

impl TaxYearConfig {
    /// Creates a new TaxYearConfig from its component parts.
    pub fn new(
        metadata: TaxYearMetadata,
        brackets: Vec<TaxBracket>,
        labor_credit: CreditSchedule,
        general_credit: CreditSchedule,
        ruling: RulingConfig,
    ) -> Self {
        let mut ruling = ruling;
        ruling.tiers.sort_by_key(|t| t.from_year);
        Self {
            metadata,
            brackets,
            labor_credit,
            general_credit,
            ruling,
        }
    }

    /// Returns the tax-year metadata.
    pub fn metadata(&self) -> &TaxYearMetadata {
        &self.metadata
    }

    /// Returns the progressive tax brackets.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns the labor credit schedule.
    pub fn labor_credit(&self) -> &CreditSchedule {
        &self.labor_credit
    }

    /// Returns the general credit schedule.
    pub fn general_credit(&self) -> &CreditSchedule {
        &self.general_credit
    }

    /// Returns the ruling configuration.
    pub fn ruling(&self) -> &RulingConfig {
        &self.ruling
    }
}
