//! Expat ruling eligibility.
//!
//! A taxpayer qualifies through one of two paths:
//! - senior: aged 30 or over and earning at least the senior threshold
//! - junior: under 30, holding a qualifying credential and earning at least
//!   the junior threshold
//!
//! Thresholds are compared against the true gross salary, before the ruling
//! cap is applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EligibilityProfile;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Eligibility, EligibilityPath};

/// Age from which the senior path applies.
pub const SENIOR_AGE: u32 = 30;

/// The result of an eligibility check, including the decision and audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    /// The eligibility decision.
    pub eligibility: Eligibility,
    /// The audit step recording this check.
    pub audit_step: AuditStep,
}

/// Decides whether a taxpayer qualifies for the ruling.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if `gross_annual_salary` is negative.
///
/// # Examples
///
/// ```
/// use nl_income_engine::calculation::evaluate_eligibility;
/// use nl_income_engine::config::EligibilityProfile;
/// use nl_income_engine::models::EligibilityPath;
/// use rust_decimal::Decimal;
///
/// let profile = EligibilityProfile {
///     senior_threshold: Decimal::new(66657, 0),
///     junior_threshold: Decimal::new(50668, 0),
///     salary_cap: Decimal::new(246000, 0),
/// };
///
/// let result = evaluate_eligibility(28, true, Decimal::new(55000, 0), &profile, 1).unwrap();
/// assert_eq!(result.eligibility.path, Some(EligibilityPath::Junior));
/// ```
pub fn evaluate_eligibility(
    age: u32,
    has_qualifying_credential: bool,
    gross_annual_salary: Decimal,
    profile: &EligibilityProfile,
    step_number: u32,
) -> EngineResult<EligibilityResult> {
    if gross_annual_salary < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "gross_annual_salary",
            "must not be negative",
        ));
    }

    let (path, threshold) = if age >= SENIOR_AGE {
        (EligibilityPath::Senior, Some(profile.senior_threshold))
    } else if has_qualifying_credential {
        (EligibilityPath::Junior, Some(profile.junior_threshold))
    } else {
        (EligibilityPath::Junior, None)
    };

    let is_eligible = threshold.is_some_and(|t| gross_annual_salary >= t);
    let eligibility = Eligibility {
        is_eligible,
        path: is_eligible.then_some(path),
    };
    debug!(age, %gross_annual_salary, is_eligible, "Ruling eligibility evaluated");

    let reasoning = match threshold {
        Some(t) if is_eligible => format!(
            "Age {}: €{} meets the {:?} threshold of €{}",
            age,
            gross_annual_salary.normalize(),
            path,
            t.normalize()
        ),
        Some(t) => format!(
            "Age {}: €{} is below the {:?} threshold of €{}",
            age,
            gross_annual_salary.normalize(),
            path,
            t.normalize()
        ),
        None => format!(
            "Age {} without a qualifying credential: no path to the ruling",
            age
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "ruling_eligibility".to_string(),
        rule_name: "Ruling Eligibility".to_string(),
        input: serde_json::json!({
            "age": age,
            "has_qualifying_credential": has_qualifying_credential,
            "gross_annual_salary": gross_annual_salary.normalize().to_string(),
            "senior_threshold": profile.senior_threshold.to_string(),
            "junior_threshold": profile.junior_threshold.to_string(),
        }),
        output: serde_json::json!({
            "is_eligible": is_eligible,
            "path": eligibility.path,
        }),
        reasoning,
    };

    Ok(EligibilityResult {
        eligibility,
        audit_step,
    })
}
