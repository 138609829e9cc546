//! The disposable income projection.
//!
//! Chains eligibility, the ruling schedule and the yearly aggregation into a
//! single [`ProjectionResult`] with a numbered audit trace.

use std::time::Instant;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{AuditTrace, AuditWarning, ProjectionInput, ProjectionResult};

use super::{SENIOR_AGE, aggregate, evaluate_eligibility, project_ruling_schedule};

/// Projects yearly net and disposable income for a taxpayer.
///
/// Steps, in order:
/// 1. validate the input and annualise the monthly salary
/// 2. resolve fixed monthly costs
/// 3. decide eligibility on the uncapped salary
/// 4. project the ruling schedule
/// 5. aggregate every year
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidInput`] for out-of-domain
/// input and [`crate::error::EngineError::EligibilityProfileNotFound`] when
/// the requested profile does not exist.
///
/// # Examples
///
/// ```no_run
/// use nl_income_engine::calculation::compute_disposable_income_projection;
/// use nl_income_engine::config::ConfigLoader;
/// use nl_income_engine::models::ProjectionInput;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/nl-2025").unwrap();
/// let input = ProjectionInput {
///     age: 32,
///     has_qualifying_credential: false,
///     gross_monthly_salary: Decimal::new(6210, 0),
///     ruling_start_date: "2026-01-01".to_string(),
///     horizon_years: 10,
///     fixed_monthly_costs: Some(Decimal::new(2000, 0)),
///     cost_breakdown: None,
///     eligibility_profile: None,
/// };
///
/// let result = compute_disposable_income_projection(&input, &loader).unwrap();
/// assert!(result.eligibility.is_eligible);
/// assert_eq!(result.years.len(), 10);
/// ```
pub fn compute_disposable_income_projection(
    input: &ProjectionInput,
    config: &ConfigLoader,
) -> EngineResult<ProjectionResult> {
    let start_time = Instant::now();

    let profile = input.to_profile()?;
    let fixed_monthly_costs = input.resolve_fixed_costs()?;
    let profile_name = input
        .eligibility_profile
        .as_deref()
        .unwrap_or_else(|| config.default_profile_name());
    let eligibility_profile = config.eligibility_profile(Some(profile_name))?;

    let mut audit_steps = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    if profile.has_qualifying_credential && profile.age >= SENIOR_AGE {
        warnings.push(AuditWarning {
            code: "CREDENTIAL_NOT_APPLICABLE".to_string(),
            message: format!(
                "A qualifying credential only matters under {}; age {} uses the senior threshold",
                SENIOR_AGE, profile.age
            ),
            severity: "low".to_string(),
        });
    }

    let eligibility_result = evaluate_eligibility(
        profile.age,
        profile.has_qualifying_credential,
        profile.gross_annual_salary,
        eligibility_profile,
        step_number,
    )?;
    let eligibility = eligibility_result.eligibility;
    audit_steps.push(eligibility_result.audit_step);
    step_number += 1;

    let schedule_result = project_ruling_schedule(
        &profile,
        eligibility.is_eligible,
        config.config().ruling(),
        eligibility_profile,
        step_number,
    )?;
    step_number += schedule_result.audit_steps.len() as u32;
    audit_steps.extend(schedule_result.audit_steps);
    warnings.extend(schedule_result.warnings);
    let schedule = schedule_result.schedule;

    let aggregation = aggregate(&schedule, fixed_monthly_costs, config.config(), step_number)?;
    audit_steps.extend(aggregation.audit_steps);
    warnings.extend(aggregation.warnings);

    let duration_us = start_time.elapsed().as_micros() as u64;
    debug!(
        is_eligible = eligibility.is_eligible,
        years = aggregation.years.len(),
        warnings = warnings.len(),
        duration_us,
        "Projection computed"
    );

    Ok(ProjectionResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        tax_year: config.metadata().code.clone(),
        eligibility_profile: profile_name.to_string(),
        eligibility,
        gross_annual_salary: schedule.gross_salary,
        base_salary: schedule.base_salary,
        fixed_monthly_costs,
        years: aggregation.years,
        audit_trace: AuditTrace {
            steps: audit_steps,
            warnings,
            duration_us,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{EligibilityPath, FixedCostBreakdown, RulingPhase};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn loader() -> ConfigLoader {
        ConfigLoader::load("./config/nl-2025").expect("Failed to load config")
    }

    fn create_input() -> ProjectionInput {
        ProjectionInput {
            age: 32,
            has_qualifying_credential: false,
            gross_monthly_salary: dec("6210"),
            ruling_start_date: "2026-01-01".to_string(),
            horizon_years: 10,
            fixed_monthly_costs: None,
            cost_breakdown: None,
            eligibility_profile: None,
        }
    }

    #[test]
    fn test_senior_january_start_ten_years() {
        let result = compute_disposable_income_projection(&create_input(), &loader()).unwrap();

        assert!(result.eligibility.is_eligible);
        assert_eq!(result.eligibility.path, Some(EligibilityPath::Senior));
        assert_eq!(result.gross_annual_salary, dec("74520"));
        assert_eq!(result.years.len(), 10);

        assert_eq!(result.year(2026).unwrap().taxable_income, dec("52164"));
        for year in 2027..=2030 {
            assert_eq!(result.year(year).unwrap().taxable_income, dec("54399.6"));
        }
        for year in 2031..=2035 {
            let entry = result.year(year).unwrap();
            assert_eq!(entry.taxable_income, dec("74520"));
            assert_eq!(entry.phase, RulingPhase::NoRelief);
        }

        assert_eq!(result.year(2026).unwrap().monthly_net_income, dec("3199.14"));
        assert_eq!(result.year(2031).unwrap().monthly_net_income, dec("4140.20"));
    }

    #[test]
    fn test_junior_without_credential_is_taxed_in_full() {
        let mut input = create_input();
        input.age = 28;
        input.gross_monthly_salary = dec("3500");
        input.horizon_years = 3;

        let result = compute_disposable_income_projection(&input, &loader()).unwrap();
        assert!(!result.eligibility.is_eligible);
        assert_eq!(result.eligibility.path, None);
        for year in &result.years {
            assert_eq!(year.taxable_income, dec("42000"));
            assert_eq!(year.phase, RulingPhase::Ineligible);
            assert_eq!(year.months_at_relief, 0);
        }
    }

    #[test]
    fn test_profile_selection_changes_outcome() {
        let mut input = create_input();
        input.gross_monthly_salary = dec("4000");

        let default = compute_disposable_income_projection(&input, &loader()).unwrap();
        assert!(!default.eligibility.is_eligible);
        assert_eq!(default.eligibility_profile, "grossed_up");

        input.eligibility_profile = Some("taxable_salary".to_string());
        let lenient = compute_disposable_income_projection(&input, &loader()).unwrap();
        assert!(lenient.eligibility.is_eligible);
        assert_eq!(lenient.eligibility_profile, "taxable_salary");
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let mut input = create_input();
        input.eligibility_profile = Some("nope".to_string());
        let result = compute_disposable_income_projection(&input, &loader());
        assert!(matches!(
            result,
            Err(EngineError::EligibilityProfileNotFound { .. })
        ));
    }

    #[test]
    fn test_costs_from_breakdown() {
        let mut input = create_input();
        input.cost_breakdown = Some(FixedCostBreakdown {
            rent: dec("1650"),
            utilities: dec("215.90"),
            car: dec("0"),
            health_insurance: dec("134.10"),
        });
        let result = compute_disposable_income_projection(&input, &loader()).unwrap();
        assert_eq!(result.fixed_monthly_costs, dec("2000.00"));
        // 4140.195 - 2000
        assert_eq!(
            result.year(2031).unwrap().disposable_monthly_income,
            dec("2140.20")
        );
    }

    #[test]
    fn test_credential_warning_for_senior() {
        let mut input = create_input();
        input.has_qualifying_credential = true;
        let result = compute_disposable_income_projection(&input, &loader()).unwrap();
        assert!(result
            .audit_trace
            .warnings
            .iter()
            .any(|w| w.code == "CREDENTIAL_NOT_APPLICABLE"));
    }

    #[test]
    fn test_audit_trace_numbering_is_contiguous() {
        let result = compute_disposable_income_projection(&create_input(), &loader()).unwrap();
        let steps = &result.audit_trace.steps;
        // eligibility + salary cap + 10 ruling years + 4 per aggregated year
        assert_eq!(steps.len(), 1 + 1 + 10 + 40);
        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.step_number, index as u32 + 1);
        }
        assert_eq!(steps[0].rule_id, "ruling_eligibility");
        assert_eq!(steps[1].rule_id, "salary_cap");
    }

    #[test]
    fn test_invalid_horizon_rejected() {
        let mut input = create_input();
        input.horizon_years = 0;
        let result = compute_disposable_income_projection(&input, &loader());
        assert!(matches!(
            result,
            Err(EngineError::InvalidInput { ref field, .. }) if field == "horizon_years"
        ));
    }

    #[test]
    fn test_result_metadata() {
        let result = compute_disposable_income_projection(&create_input(), &loader()).unwrap();
        assert_eq!(result.tax_year, "nl-2025");
        assert_eq!(result.engine_version, env!("CARGO_PKG_VERSION"));
        assert!(!result.calculation_id.is_nil());
    }
}
