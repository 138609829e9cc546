//! Year-by-year projection of the expat ruling.
//!
//! The relief window runs `window_years * 12` months from the start month.
//! Laid over calendar years this gives, for year index `i`:
//!
//! | index            | phase          | months at relief        |
//! |------------------|----------------|-------------------------|
//! | 0                | `RampStart`    | `13 - start_month`      |
//! | 1 ..= window - 1 | `FullRelief`   | 12                      |
//! | window           | `RampEnd`      | `12 - months(index 0)`  |
//! | > window         | `NoRelief`     | 0                       |
//!
//! A January start leaves nothing for the closing year, which is then
//! `NoRelief`. The rate of every relieved year is the tier rate of that
//! calendar year, so a ruling that started at 30% drops to 27% in 2027 and a
//! ruling that starts in 2027 or later begins at 27%.
//!
//! Salaries above the profile's cap are clamped to it before anything else,
//! so every year, relieved or not, is derived from the capped base.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EligibilityProfile, RulingConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, RulingPhase, RulingYear, RulingYearSchedule, TaxpayerProfile,
};

use super::round_currency;

const MONTHS_PER_YEAR: u32 = 12;

/// The result of projecting a ruling schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulingScheduleResult {
    /// One entry per projected calendar year.
    pub schedule: RulingYearSchedule,
    /// The salary cap step followed by one step per year.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while projecting.
    pub warnings: Vec<AuditWarning>,
}

/// Places a year index in the relief window.
fn phase_for(index: u32, window_years: u32, months_in_start_year: u32) -> (RulingPhase, u32) {
    let closing_months = MONTHS_PER_YEAR - months_in_start_year;
    if index == 0 {
        (RulingPhase::RampStart, months_in_start_year)
    } else if index < window_years {
        (RulingPhase::FullRelief, MONTHS_PER_YEAR)
    } else if index == window_years && closing_months > 0 {
        (RulingPhase::RampEnd, closing_months)
    } else {
        (RulingPhase::NoRelief, 0)
    }
}

/// Projects taxable income for each year of the horizon.
///
/// The salary is clamped to the profile's cap and every year is derived
/// from that base: `taxable = base - round(base * rate * months / 12)`.
/// An ineligible profile gets every year at the base salary.
///
/// # Arguments
///
/// * `profile` - The validated taxpayer profile
/// * `is_eligible` - Outcome of the eligibility check
/// * `ruling` - Tiers and window length
/// * `eligibility_profile` - Supplies the salary cap
/// * `step_number` - The step number of the first audit step
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when a relieved year has no tier
/// configured, and [`EngineError::CalculationError`] when the horizon runs
/// past the representable calendar.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use nl_income_engine::calculation::project_ruling_schedule;
/// use nl_income_engine::config::ConfigLoader;
/// use nl_income_engine::models::TaxpayerProfile;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/nl-2025").unwrap();
/// let profile = TaxpayerProfile {
///     age: 32,
///     has_qualifying_credential: false,
///     gross_annual_salary: Decimal::new(74520, 0),
///     ruling_start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     horizon_years: 10,
/// };
/// let result = project_ruling_schedule(
///     &profile,
///     true,
///     loader.config().ruling(),
///     loader.eligibility_profile(None).unwrap(),
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.schedule.len(), 10);
/// ```
pub fn project_ruling_schedule(
    profile: &TaxpayerProfile,
    is_eligible: bool,
    ruling: &RulingConfig,
    eligibility_profile: &EligibilityProfile,
    step_number: u32,
) -> EngineResult<RulingScheduleResult> {
    let gross_salary = profile.gross_annual_salary;
    let base_salary = gross_salary.min(eligibility_profile.salary_cap);
    let capped = gross_salary > eligibility_profile.salary_cap;

    let mut audit_steps = Vec::with_capacity(profile.horizon_years as usize + 1);
    let mut warnings = Vec::new();

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "salary_cap".to_string(),
        rule_name: "Ruling Salary Cap".to_string(),
        input: serde_json::json!({
            "gross_annual_salary": gross_salary.normalize().to_string(),
            "salary_cap": eligibility_profile.salary_cap.to_string(),
        }),
        output: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "capped": capped,
        }),
        reasoning: if capped {
            format!(
                "€{} exceeds the cap; every year is computed on €{}",
                gross_salary.normalize(),
                base_salary.normalize()
            )
        } else {
            format!("€{} is within the cap", gross_salary.normalize())
        },
    });

    if capped && is_eligible {
        warnings.push(AuditWarning {
            code: "SALARY_CAPPED".to_string(),
            message: format!(
                "Salary of €{} exceeds the ruling cap of €{}; the projection uses the capped amount",
                gross_salary.normalize(),
                eligibility_profile.salary_cap.normalize()
            ),
            severity: "low".to_string(),
        });
    }

    let start_year = profile.ruling_start_date.year();
    let months_in_start_year = MONTHS_PER_YEAR + 1 - profile.ruling_start_date.month();
    let mut years = Vec::with_capacity(profile.horizon_years as usize);

    for index in 0..profile.horizon_years {
        let year = i32::try_from(index)
            .ok()
            .and_then(|offset| start_year.checked_add(offset))
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("projection year {} after {} is out of range", index, start_year),
            })?;

        let (phase, months_at_relief) = if is_eligible {
            phase_for(index, ruling.window_years, months_in_start_year)
        } else {
            (RulingPhase::Ineligible, 0)
        };

        let relief_fraction = if months_at_relief > 0 {
            ruling.tier_rate(year).ok_or_else(|| {
                EngineError::invalid_input(
                    "ruling_start_date",
                    format!("no ruling tier is configured for {}", year),
                )
            })?
        } else {
            Decimal::ZERO
        };

        let relief = round_currency(
            base_salary * relief_fraction * Decimal::from(months_at_relief)
                / Decimal::from(MONTHS_PER_YEAR),
        );
        let taxable_income = base_salary - relief;
        debug!(year, ?phase, months_at_relief, %relief_fraction, %taxable_income, "Ruling year projected");

        audit_steps.push(AuditStep {
            step_number: step_number + 1 + index,
            rule_id: "ruling_year".to_string(),
            rule_name: "Ruling Year".to_string(),
            input: serde_json::json!({
                "year": year,
                "year_index": index,
                "base_salary": base_salary.normalize().to_string(),
            }),
            output: serde_json::json!({
                "phase": phase,
                "relief_fraction": relief_fraction.to_string(),
                "months_at_relief": months_at_relief,
                "relief": relief.to_string(),
                "taxable_income": taxable_income.normalize().to_string(),
            }),
            reasoning: if months_at_relief > 0 {
                format!(
                    "{}: {} month(s) at {}% relief on €{} = €{} exempt",
                    year,
                    months_at_relief,
                    (relief_fraction * Decimal::ONE_HUNDRED).normalize(),
                    base_salary.normalize(),
                    relief
                )
            } else {
                format!("{}: no relief, fully taxable", year)
            },
        });

        years.push(RulingYear {
            year,
            phase,
            relief_fraction,
            months_at_relief,
            taxable_income,
        });
    }

    Ok(RulingScheduleResult {
        schedule: RulingYearSchedule {
            gross_salary,
            base_salary,
            years,
        },
        audit_steps,
        warnings,
    })
}
