//! Progressive income tax calculation.
//!
//! This module applies the Box 1 bracket schedule to a year's taxable income.
//! The brackets come from the tax-year configuration; a different year simply
//! supplies a different table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TaxBracket;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::round_currency;

/// The result of computing income tax, including the amount and audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    /// Tax owed before credits, rounded to cents.
    pub tax_owed: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes progressive income tax on a year's taxable income.
///
/// Walks the brackets in ascending order with a running lower bound. The slice
/// taxed in each bracket is `max(0, min(income, upper_bound) - lower_bound)`,
/// and the walk stops at the first bracket containing the income.
///
/// # Arguments
///
/// * `taxable_income` - Taxable income for one calendar year
/// * `brackets` - Brackets sorted ascending, the last one unbounded
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if `taxable_income` is negative.
///
/// # Examples
///
/// ```
/// use nl_income_engine::calculation::compute_tax;
/// use nl_income_engine::config::TaxBracket;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let brackets = vec![
///     TaxBracket { upper_bound: Some(dec("38441")), rate: dec("0.3582") },
///     TaxBracket { upper_bound: Some(dec("76817")), rate: dec("0.3748") },
///     TaxBracket { upper_bound: None, rate: dec("0.4950") },
/// ];
///
/// let result = compute_tax(dec("74520.6"), &brackets, 1).unwrap();
/// assert_eq!(result.tax_owed, dec("27292.20"));
/// ```
pub fn compute_tax(
    taxable_income: Decimal,
    brackets: &[TaxBracket],
    step_number: u32,
) -> EngineResult<IncomeTaxResult> {
    if taxable_income < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "taxable_income",
            format!("{} must not be negative", taxable_income),
        ));
    }

    let mut tax = Decimal::ZERO;
    let mut lower_bound = Decimal::ZERO;
    let mut slices = Vec::with_capacity(brackets.len());

    for bracket in brackets {
        let top = match bracket.upper_bound {
            Some(upper_bound) => taxable_income.min(upper_bound),
            None => taxable_income,
        };
        let amount_in_bracket = (top - lower_bound).max(Decimal::ZERO);
        let bracket_tax = amount_in_bracket * bracket.rate;
        tax += bracket_tax;

        slices.push(serde_json::json!({
            "lower_bound": lower_bound.normalize().to_string(),
            "upper_bound": bracket.upper_bound.map(|b| b.normalize().to_string()),
            "rate": bracket.rate.normalize().to_string(),
            "amount": amount_in_bracket.normalize().to_string(),
            "tax": bracket_tax.normalize().to_string(),
        }));

        match bracket.upper_bound {
            Some(upper_bound) if taxable_income > upper_bound => lower_bound = upper_bound,
            _ => break,
        }
    }

    let tax_owed = round_currency(tax);
    let brackets_used = slices.len();
    debug!(%taxable_income, %tax_owed, brackets_used, "Income tax computed");

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Progressive Income Tax".to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
        }),
        output: serde_json::json!({
            "tax_owed": tax_owed.to_string(),
            "slices": slices,
        }),
        reasoning: format!(
            "€{} taxed across {} bracket(s) = €{}",
            taxable_income.normalize(),
            brackets_used,
            tax_owed
        ),
    };

    Ok(IncomeTaxResult {
        tax_owed,
        audit_step,
    })
}
