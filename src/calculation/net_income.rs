//! Net and disposable income aggregation.
//!
//! Each projected year is run independently through the income tax and the
//! two credits, all on the year's taxable income, then reduced to annual and
//! monthly figures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TaxYearConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, RulingYear, RulingYearSchedule, YearlyFinancialResult,
};

use super::{compute_general_credit, compute_labor_credit, compute_tax, round_currency};

/// Number of audit steps recorded per aggregated year.
pub const STEPS_PER_YEAR: u32 = 4;

/// The financial result for one year with its audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearAggregation {
    /// The computed figures.
    pub result: YearlyFinancialResult,
    /// Tax, labor credit, general credit and net income steps, in order.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised for this year.
    pub warnings: Vec<AuditWarning>,
}

/// The financial results for a whole schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// One result per schedule year, in schedule order.
    pub years: Vec<YearlyFinancialResult>,
    /// All audit steps, [`STEPS_PER_YEAR`] per year.
    pub audit_steps: Vec<AuditStep>,
    /// All warnings raised.
    pub warnings: Vec<AuditWarning>,
}

/// Computes net and disposable income for one schedule year.
///
/// `base_salary` is the capped salary of the schedule; the difference between
/// it and the year's taxable income is the tax-free relief added back for
/// `total_cash_annual_income`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when `fixed_monthly_costs` is
/// negative, and propagates errors from the tax and credit calculators.
pub fn aggregate_year(
    ruling_year: &RulingYear,
    base_salary: Decimal,
    fixed_monthly_costs: Decimal,
    config: &TaxYearConfig,
    step_number: u32,
) -> EngineResult<YearAggregation> {
    if fixed_monthly_costs < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "fixed_monthly_costs",
            "must not be negative",
        ));
    }

    let taxable_income = ruling_year.taxable_income;
    let tax = compute_tax(taxable_income, config.brackets(), step_number)?;
    let labor = compute_labor_credit(taxable_income, config, step_number + 1)?;
    let general = compute_general_credit(taxable_income, config, step_number + 2)?;

    let net_tax = tax.tax_owed - (labor.credit + general.credit);
    let net_annual_income = taxable_income - net_tax;
    let tax_free_relief = base_salary - taxable_income;
    let months = Decimal::from(12);
    let total_cash_annual_income = net_annual_income + tax_free_relief;

    let monthly_net_income = round_currency(net_annual_income / months);
    let monthly_before_floor = round_currency(net_annual_income / months - fixed_monthly_costs);
    let disposable_monthly_income = monthly_before_floor.max(Decimal::ZERO);
    let disposable_monthly_cash_income =
        round_currency(total_cash_annual_income / months - fixed_monthly_costs).max(Decimal::ZERO);

    debug!(
        year = ruling_year.year,
        %taxable_income,
        %net_tax,
        %net_annual_income,
        %disposable_monthly_income,
        "Year aggregated"
    );

    let mut warnings = Vec::new();
    if net_tax < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "NET_TAX_SUBSIDY".to_string(),
            message: format!(
                "{}: credits exceed tax by €{}, net tax is negative",
                ruling_year.year,
                -net_tax
            ),
            severity: "low".to_string(),
        });
    }
    if monthly_before_floor < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "DISPOSABLE_INCOME_FLOORED".to_string(),
            message: format!(
                "{}: fixed costs of €{} exceed monthly net income of €{}",
                ruling_year.year, fixed_monthly_costs, monthly_net_income
            ),
            severity: "medium".to_string(),
        });
    }

    let net_step = AuditStep {
        step_number: step_number + 3,
        rule_id: "net_income".to_string(),
        rule_name: "Net Income".to_string(),
        input: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string(),
            "tax_owed": tax.tax_owed.to_string(),
            "labor_credit": labor.credit.to_string(),
            "general_credit": general.credit.to_string(),
            "fixed_monthly_costs": fixed_monthly_costs.normalize().to_string(),
        }),
        output: serde_json::json!({
            "net_tax": net_tax.to_string(),
            "net_annual_income": net_annual_income.to_string(),
            "total_cash_annual_income": total_cash_annual_income.to_string(),
            "monthly_net_income": monthly_net_income.to_string(),
            "disposable_monthly_income": disposable_monthly_income.to_string(),
        }),
        reasoning: format!(
            "{}: €{} - (€{} - €{} - €{}) = €{} net per year",
            ruling_year.year,
            taxable_income.normalize(),
            tax.tax_owed,
            labor.credit,
            general.credit,
            net_annual_income
        ),
    };

    let result = YearlyFinancialResult {
        year: ruling_year.year,
        label: ruling_year.label(),
        phase: ruling_year.phase,
        relief_fraction: ruling_year.relief_fraction,
        months_at_relief: ruling_year.months_at_relief,
        taxable_income,
        tax_owed: tax.tax_owed,
        labor_credit: labor.credit,
        general_credit: general.credit,
        net_tax,
        net_annual_income,
        total_cash_annual_income,
        monthly_net_income,
        disposable_monthly_income,
        disposable_monthly_cash_income,
    };

    Ok(YearAggregation {
        result,
        audit_steps: vec![tax.audit_step, labor.audit_step, general.audit_step, net_step],
        warnings,
    })
}

/// Aggregates every year of a schedule.
///
/// Years are independent; the output preserves schedule order.
///
/// # Examples
///
/// ```no_run
/// use nl_income_engine::calculation::aggregate;
/// use nl_income_engine::config::ConfigLoader;
/// use nl_income_engine::models::{RulingPhase, RulingYear, RulingYearSchedule};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/nl-2025").unwrap();
/// let schedule = RulingYearSchedule {
///     gross_salary: Decimal::new(40000, 0),
///     base_salary: Decimal::new(40000, 0),
///     years: vec![RulingYear {
///         year: 2026,
///         phase: RulingPhase::Ineligible,
///         relief_fraction: Decimal::ZERO,
///         months_at_relief: 0,
///         taxable_income: Decimal::new(40000, 0),
///     }],
/// };
///
/// let result = aggregate(&schedule, Decimal::new(1500, 0), loader.config(), 1).unwrap();
/// assert_eq!(result.years[0].monthly_net_income, Decimal::new(268711, 2));
/// ```
pub fn aggregate(
    schedule: &RulingYearSchedule,
    fixed_monthly_costs: Decimal,
    config: &TaxYearConfig,
    step_number: u32,
) -> EngineResult<AggregationResult> {
    let mut years = Vec::with_capacity(schedule.len());
    let mut audit_steps = Vec::with_capacity(schedule.len() * STEPS_PER_YEAR as usize);
    let mut warnings = Vec::new();

    let mut step = step_number;
    for ruling_year in &schedule.years {
        let aggregation = aggregate_year(
            ruling_year,
            schedule.base_salary,
            fixed_monthly_costs,
            config,
            step,
        )?;
        step += STEPS_PER_YEAR;
        years.push(aggregation.result);
        audit_steps.extend(aggregation.audit_steps);
        warnings.extend(aggregation.warnings);
    }

    Ok(AggregationResult {
        years,
        audit_steps,
        warnings,
    })
}
