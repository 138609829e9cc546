//! Labor and general tax credit calculation.
//!
//! Both credits are phase schedules over the same salary axis: a salary
//! falls in exactly one phase, whose formula yields the credit. The result
//! is floored at zero and rounded to cents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CreditFormula, CreditSchedule, TaxYearConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::round_currency;

/// The two credits a salaried employee receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditKind {
    /// Arbeidskorting: builds up with earned income, plateaus, then phases out.
    Labor,
    /// Algemene heffingskorting: flat, then phases out.
    General,
}

impl CreditKind {
    fn rule_id(self) -> &'static str {
        match self {
            CreditKind::Labor => "labor_credit",
            CreditKind::General => "general_credit",
        }
    }

    fn rule_name(self) -> &'static str {
        match self {
            CreditKind::Labor => "Labor Credit",
            CreditKind::General => "General Credit",
        }
    }
}

/// The result of computing a credit, including the amount and audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditResult {
    /// Which credit was computed.
    pub kind: CreditKind,
    /// The credit amount, never negative, rounded to cents.
    pub credit: Decimal,
    /// Index of the schedule phase the salary fell in.
    pub phase_index: usize,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn formula_name(formula: &CreditFormula) -> &'static str {
    match formula {
        CreditFormula::FlatZero => "flat_zero",
        CreditFormula::LinearBuildup { .. } => "linear_buildup",
        CreditFormula::FlatPlateau { .. } => "flat_plateau",
        CreditFormula::LinearPhaseout { .. } => "linear_phaseout",
    }
}

fn apply_formula(formula: &CreditFormula, salary: Decimal, lower_bound: Decimal) -> Decimal {
    match *formula {
        CreditFormula::FlatZero => Decimal::ZERO,
        CreditFormula::LinearBuildup { rate, max_amount } => {
            let built_up = (salary - lower_bound) * rate;
            match max_amount {
                Some(max) => built_up.min(max),
                None => built_up,
            }
        }
        CreditFormula::FlatPlateau { amount } => amount,
        CreditFormula::LinearPhaseout { from_amount, rate } => {
            from_amount - (salary - lower_bound) * rate
        }
    }
}

/// Computes a credit from its phase schedule.
///
/// The salary belongs to the first phase whose upper bound is at or above it.
/// Build-up and phase-out are measured from that phase's lower bound.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if `salary` is negative, and
/// [`EngineError::CalculationError`] if no phase covers the salary.
pub fn compute_credit(
    kind: CreditKind,
    salary: Decimal,
    schedule: &CreditSchedule,
    step_number: u32,
) -> EngineResult<CreditResult> {
    if salary < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "salary",
            format!("{} must not be negative", salary),
        ));
    }

    let mut lower_bound = Decimal::ZERO;
    let mut matched = None;
    for (index, phase) in schedule.phases.iter().enumerate() {
        match phase.upper_bound {
            Some(upper_bound) if salary > upper_bound => lower_bound = upper_bound,
            _ => {
                matched = Some((index, phase));
                break;
            }
        }
    }

    let (phase_index, phase) = matched.ok_or_else(|| EngineError::CalculationError {
        message: format!("no {} phase covers a salary of {}", kind.rule_id(), salary),
    })?;

    let raw = apply_formula(&phase.formula, salary, lower_bound);
    let credit = round_currency(raw.max(Decimal::ZERO));
    debug!(credit_kind = kind.rule_id(), %salary, phase_index, %credit, "Credit computed");

    let audit_step = AuditStep {
        step_number,
        rule_id: kind.rule_id().to_string(),
        rule_name: kind.rule_name().to_string(),
        input: serde_json::json!({
            "salary": salary.normalize().to_string(),
        }),
        output: serde_json::json!({
            "credit": credit.to_string(),
            "phase_index": phase_index,
            "formula": formula_name(&phase.formula),
            "phase_lower_bound": lower_bound.normalize().to_string(),
        }),
        reasoning: format!(
            "€{} falls in phase {} ({}) = €{}",
            salary.normalize(),
            phase_index + 1,
            formula_name(&phase.formula),
            credit
        ),
    };

    Ok(CreditResult {
        kind,
        credit,
        phase_index,
        audit_step,
    })
}

/// Computes the labor credit for a year's income.
///
/// # Examples
///
/// ```no_run
/// use nl_income_engine::calculation::compute_labor_credit;
/// use nl_income_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/nl-2025").unwrap();
/// let result = compute_labor_credit(Decimal::new(30000, 0), loader.config(), 1).unwrap();
/// assert_eq!(result.credit, Decimal::new(415200, 2));
/// ```
pub fn compute_labor_credit(
    salary: Decimal,
    config: &TaxYearConfig,
    step_number: u32,
) -> EngineResult<CreditResult> {
    compute_credit(CreditKind::Labor, salary, config.labor_credit(), step_number)
}

/// Computes the general credit for a year's income.
pub fn compute_general_credit(
    salary: Decimal,
    config: &TaxYearConfig,
    step_number: u32,
) -> EngineResult<CreditResult> {
    compute_credit(
        CreditKind::General,
        salary,
        config.general_credit(),
        step_number,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, CreditPhase};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn config() -> TaxYearConfig {
        ConfigLoader::load("./config/nl-2025")
            .expect("Failed to load config")
            .config()
            .clone()
    }

    fn labor(salary: &str) -> Decimal {
        compute_labor_credit(dec(salary), &config(), 1).unwrap().credit
    }

    fn general(salary: &str) -> Decimal {
        compute_general_credit(dec(salary), &config(), 1).unwrap().credit
    }

    #[test]
    fn test_labor_credit_zero_below_first_bound() {
        assert_eq!(labor("0"), dec("0"));
        assert_eq!(labor("11491"), dec("0"));
    }

    #[test]
    fn test_labor_credit_builds_up() {
        // (20000 - 11491) * 0.3115 = 2650.5535
        assert_eq!(labor("20000"), dec("2650.55"));
    }

    #[test]
    fn test_labor_credit_buildup_capped_at_plateau() {
        // (24821 - 11491) * 0.3115 = 4152.295, capped
        assert_eq!(labor("24821"), dec("4152.00"));
    }

    #[test]
    fn test_labor_credit_plateau() {
        assert_eq!(labor("30000"), dec("4152.00"));
        assert_eq!(labor("39958"), dec("4152.00"));
    }

    #[test]
    fn test_labor_credit_phases_out() {
        // 4152 - (40000 - 39958) * 0.06
        assert_eq!(labor("40000"), dec("4149.48"));
        // 4152 - (74520 - 39958) * 0.06
        assert_eq!(labor("74520"), dec("2078.28"));
    }

    #[test]
    fn test_labor_credit_floored_at_zero_in_phaseout() {
        // 4152 - (124934 - 39958) * 0.06 = -946.56
        assert_eq!(labor("124934"), dec("0"));
    }

    #[test]
    fn test_labor_credit_zero_above_last_bound() {
        assert_eq!(labor("200000"), dec("0"));
    }

    #[test]
    fn test_general_credit_flat_at_low_income() {
        assert_eq!(general("0"), dec("3362.00"));
        assert_eq!(general("24812"), dec("3362.00"));
    }

    #[test]
    fn test_general_credit_phases_out() {
        // 3362 - (40000 - 24812) * 0.06007 = 2449.65684
        assert_eq!(general("40000"), dec("2449.66"));
    }

    #[test]
    fn test_general_credit_zero_above_last_bound() {
        assert_eq!(general("100000"), dec("0.00"));
    }

    #[test]
    fn test_negative_salary_rejected() {
        let result = compute_labor_credit(dec("-1"), &config(), 1);
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
        let result = compute_general_credit(dec("-1"), &config(), 1);
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_uncovered_salary_is_calculation_error() {
        let schedule = CreditSchedule {
            phases: vec![CreditPhase {
                upper_bound: Some(dec("1000")),
                formula: CreditFormula::FlatZero,
            }],
        };
        let result = compute_credit(CreditKind::Labor, dec("2000"), &schedule, 1);
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_audit_step_names_phase() {
        let result = compute_labor_credit(dec("30000"), &config(), 4).unwrap();
        assert_eq!(result.phase_index, 2);
        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(result.audit_step.rule_id, "labor_credit");
        assert_eq!(
            result.audit_step.output["formula"].as_str().unwrap(),
            "flat_plateau"
        );
        assert_eq!(
            result.audit_step.output["phase_lower_bound"]
                .as_str()
                .unwrap(),
            "24821"
        );
        assert!(result.audit_step.reasoning.contains("phase 3"));
    }

    #[test]
    fn test_phaseout_measured_from_phase_lower_bound() {
        let schedule = CreditSchedule {
            phases: vec![
                CreditPhase {
                    upper_bound: Some(dec("100")),
                    formula: CreditFormula::FlatPlateau { amount: dec("50") },
                },
                CreditPhase {
                    upper_bound: None,
                    formula: CreditFormula::LinearPhaseout {
                        from_amount: dec("50"),
                        rate: dec("0.5"),
                    },
                },
            ],
        };
        let result = compute_credit(CreditKind::General, dec("140"), &schedule, 1).unwrap();
        assert_eq!(result.credit, dec("30.00"));
    }

    proptest! {
        #[test]
        fn prop_credits_are_bounded(cents in 0u64..300_000_00) {
            let config = config();
            let salary = Decimal::new(cents as i64, 2);
            let labor = compute_labor_credit(salary, &config, 1).unwrap().credit;
            let general = compute_general_credit(salary, &config, 1).unwrap().credit;
            prop_assert!(labor >= Decimal::ZERO && labor <= dec("4152.00"));
            prop_assert!(general >= Decimal::ZERO && general <= dec("3362.00"));
        }
    }
}
