//! Core data models for the Disposable Income Projection Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod projection_result;
mod ruling_schedule;
mod taxpayer;

pub use projection_result::{
    AuditStep, AuditTrace, AuditWarning, Eligibility, EligibilityPath, ProjectionResult,
    YearlyFinancialResult,
};
pub use ruling_schedule::{RulingPhase, RulingYear, RulingYearSchedule};
pub use taxpayer::{
    FixedCostBreakdown, MAX_HORIZON_YEARS, ProjectionInput, TaxpayerProfile,
    annualise_monthly_salary,
};
