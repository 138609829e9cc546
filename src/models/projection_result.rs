//! Projection result models for the Disposable Income Projection Engine.
//!
//! This module contains the [`ProjectionResult`] type and its associated structures
//! that capture all outputs from a projection: the eligibility decision, one
//! [`YearlyFinancialResult`] per projected year, and an audit trace.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RulingPhase;

/// Which eligibility path admitted a profile to the ruling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityPath {
    /// Aged 30 or over and earning at least the senior threshold.
    Senior,
    /// Under 30, holding a qualifying credential and earning at least the junior threshold.
    Junior,
}

/// The eligibility decision for a taxpayer profile.
///
/// # Example
///
/// ```
/// use nl_income_engine::models::{Eligibility, EligibilityPath};
///
/// let eligibility = Eligibility {
///     is_eligible: true,
///     path: Some(EligibilityPath::Senior),
/// };
/// assert!(eligibility.is_eligible);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    /// Whether the ruling applies.
    pub is_eligible: bool,
    /// The path that made the profile eligible; `None` when ineligible.
    pub path: Option<EligibilityPath>,
}

/// Net and disposable income figures for one calendar year.
///
/// Tax and credits are always computed on `taxable_income`. `net_tax` keeps
/// its sign: a negative value means the credits exceed the tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyFinancialResult {
    /// The calendar year.
    pub year: i32,
    /// Dashboard label, e.g. `"27% 2028"`.
    pub label: String,
    /// Position of the year in the relief window.
    pub phase: RulingPhase,
    /// Fraction of salary exempted during relieved months.
    pub relief_fraction: Decimal,
    /// Months of this year covered by relief.
    pub months_at_relief: u32,
    /// Salary subject to income tax.
    pub taxable_income: Decimal,
    /// Progressive income tax before credits.
    pub tax_owed: Decimal,
    /// Labor credit.
    pub labor_credit: Decimal,
    /// General credit.
    pub general_credit: Decimal,
    /// `tax_owed - (labor_credit + general_credit)`; may be negative.
    pub net_tax: Decimal,
    /// `taxable_income - net_tax`.
    pub net_annual_income: Decimal,
    /// `net_annual_income` plus the tax-free relief portion of the salary.
    pub total_cash_annual_income: Decimal,
    /// `net_annual_income / 12`.
    pub monthly_net_income: Decimal,
    /// `max(0, net_annual_income / 12 - fixed_monthly_costs)`.
    pub disposable_monthly_income: Decimal,
    /// `max(0, total_cash_annual_income / 12 - fixed_monthly_costs)`.
    pub disposable_monthly_cash_income: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent calculation
/// but change how the figures should be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use nl_income_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a disposable income projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// Code of the tax-year configuration used (e.g., "nl-2025").
    pub tax_year: String,
    /// Name of the eligibility profile used.
    pub eligibility_profile: String,
    /// The eligibility decision.
    pub eligibility: Eligibility,
    /// Gross annual salary as supplied (monthly x 12).
    pub gross_annual_salary: Decimal,
    /// Salary every year was computed on, after the cap.
    pub base_salary: Decimal,
    /// Fixed monthly costs subtracted for disposable income.
    pub fixed_monthly_costs: Decimal,
    /// One result per projected year, ascending.
    pub years: Vec<YearlyFinancialResult>,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl ProjectionResult {
    /// Looks up the result for a calendar year.
    pub fn year(&self, year: i32) -> Option<&YearlyFinancialResult> {
        self.years.iter().find(|y| y.year == year)
    }
}
