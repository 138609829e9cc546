//! Calculation logic for the Disposable Income Projection Engine.
//!
//! This module contains the individual rules (progressive income tax, the
//! labor and general credits, ruling eligibility and the ruling schedule),
//! the yearly net income aggregation, and the projection that chains them.
//! Every rule returns its value together with an audit step.

mod currency;
mod income_tax;
mod net_income;
mod projection;
mod ruling_eligibility;
mod ruling_schedule;
mod tax_credits;

pub use currency::round_currency;
pub use income_tax::{IncomeTaxResult, compute_tax};
pub use net_income::{
    AggregationResult, STEPS_PER_YEAR, YearAggregation, aggregate, aggregate_year,
};
pub use projection::compute_disposable_income_projection;
pub use ruling_eligibility::{EligibilityResult, SENIOR_AGE, evaluate_eligibility};
pub use ruling_schedule::{RulingScheduleResult, project_ruling_schedule};
pub use tax_credits::{
    CreditKind, CreditResult, compute_credit, compute_general_credit, compute_labor_credit,
};
