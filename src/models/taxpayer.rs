//! Taxpayer input models.
//!
//! [`ProjectionInput`] is the loosely-typed shape callers hand in (signed
//! numbers, an ISO date string). [`TaxpayerProfile`] is the validated form the
//! calculations work on.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest projection horizon accepted, in years.
pub const MAX_HORIZON_YEARS: u32 = 100;

/// Converts a gross monthly salary into an annual one.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] on `gross_monthly_salary` when the
/// annual figure does not fit in a [`Decimal`].
pub fn annualise_monthly_salary(gross_monthly_salary: Decimal) -> EngineResult<Decimal> {
    gross_monthly_salary
        .checked_mul(Decimal::from(12))
        .ok_or_else(|| EngineError::invalid_input("gross_monthly_salary", "is too large"))
}

/// Fixed monthly living costs, broken down by category.
///
/// These figures come from the benchmark lookup (rent by city and
/// accommodation type, utilities, car running costs, health insurance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCostBreakdown {
    /// Monthly rent.
    pub rent: Decimal,
    /// Monthly utilities (water, gas, electricity, internet).
    pub utilities: Decimal,
    /// Monthly car costs; zero without a car.
    #[serde(default)]
    pub car: Decimal,
    /// Monthly health insurance premium.
    pub health_insurance: Decimal,
}

impl FixedCostBreakdown {
    /// Returns the sum of all categories.
    ///
    /// # Examples
    ///
    /// ```
    /// use nl_income_engine::models::FixedCostBreakdown;
    /// use rust_decimal::Decimal;
    ///
    /// let costs = FixedCostBreakdown {
    ///     rent: Decimal::new(1650, 0),
    ///     utilities: Decimal::new(2159, 1),
    ///     car: Decimal::ZERO,
    ///     health_insurance: Decimal::new(158, 0),
    /// };
    /// assert_eq!(costs.total(), Decimal::new(20239, 1));
    /// ```
    pub fn total(&self) -> Decimal {
        self.rent + self.utilities + self.car + self.health_insurance
    }

    fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("cost_breakdown.rent", self.rent),
            ("cost_breakdown.utilities", self.utilities),
            ("cost_breakdown.car", self.car),
            ("cost_breakdown.health_insurance", self.health_insurance),
        ];
        for (field, amount) in fields {
            if amount < Decimal::ZERO {
                return Err(EngineError::invalid_input(field, "must not be negative"));
            }
        }
        Ok(())
    }
}

/// Unvalidated input to a disposable income projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Age of the employee in whole years.
    pub age: i32,
    /// Whether the employee holds a qualifying domestic graduate credential.
    #[serde(default)]
    pub has_qualifying_credential: bool,
    /// Gross monthly salary.
    pub gross_monthly_salary: Decimal,
    /// ISO-8601 date (`YYYY-MM-DD`) the ruling starts.
    pub ruling_start_date: String,
    /// Number of calendar years to project.
    pub horizon_years: i32,
    /// Fixed monthly costs as a single amount.
    #[serde(default)]
    pub fixed_monthly_costs: Option<Decimal>,
    /// Fixed monthly costs by category.
    #[serde(default)]
    pub cost_breakdown: Option<FixedCostBreakdown>,
    /// Eligibility profile name; the configured default when absent.
    #[serde(default)]
    pub eligibility_profile: Option<String>,
}

impl ProjectionInput {
    /// Validates the input and converts it into a [`TaxpayerProfile`].
    ///
    /// The monthly salary is annualised (x12) here.
    pub fn to_profile(&self) -> EngineResult<TaxpayerProfile> {
        let age = u32::try_from(self.age)
            .map_err(|_| EngineError::invalid_input("age", "must not be negative"))?;

        if self.gross_monthly_salary < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "gross_monthly_salary",
                "must not be negative",
            ));
        }

        let gross_annual_salary = annualise_monthly_salary(self.gross_monthly_salary)?;

        let ruling_start_date = NaiveDate::parse_from_str(&self.ruling_start_date, "%Y-%m-%d")
            .map_err(|e| {
                EngineError::invalid_input(
                    "ruling_start_date",
                    format!("'{}' is not a YYYY-MM-DD date: {}", self.ruling_start_date, e),
                )
            })?;

        let horizon_years = u32::try_from(self.horizon_years)
            .ok()
            .filter(|h| (1..=MAX_HORIZON_YEARS).contains(h))
            .ok_or_else(|| {
                EngineError::invalid_input(
                    "horizon_years",
                    format!("must be between 1 and {MAX_HORIZON_YEARS}"),
                )
            })?;

        Ok(TaxpayerProfile {
            age,
            has_qualifying_credential: self.has_qualifying_credential,
            gross_annual_salary,
            ruling_start_date,
            horizon_years,
        })
    }

    /// Resolves the fixed monthly costs from either the single amount or the
    /// breakdown. Supplying both is rejected; supplying neither means zero.
    pub fn resolve_fixed_costs(&self) -> EngineResult<Decimal> {
        match (&self.fixed_monthly_costs, &self.cost_breakdown) {
            (Some(_), Some(_)) => Err(EngineError::invalid_input(
                "fixed_monthly_costs",
                "provide either fixed_monthly_costs or cost_breakdown, not both",
            )),
            (Some(amount), None) if *amount < Decimal::ZERO => Err(EngineError::invalid_input(
                "fixed_monthly_costs",
                "must not be negative",
            )),
            (Some(amount), None) => Ok(*amount),
            (None, Some(breakdown)) => {
                breakdown.validate()?;
                Ok(breakdown.total())
            }
            (None, None) => Ok(Decimal::ZERO),
        }
    }
}

/// A validated taxpayer profile, immutable for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    /// Age in whole years.
    pub age: u32,
    /// Whether a qualifying graduate credential was obtained domestically.
    /// Only meaningful under 30.
    pub has_qualifying_credential: bool,
    /// Gross annual salary.
    pub gross_annual_salary: Decimal,
    /// The date the relief period begins.
    pub ruling_start_date: NaiveDate,
    /// Number of calendar years to project, counted from the start year.
    pub horizon_years: u32,
}
