//! Request types for the Disposable Income Projection Engine API.
//!
//! This module defines the JSON request structures for the `/projection`
//! and `/eligibility` endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{FixedCostBreakdown, ProjectionInput};

/// Request body for the `/projection` endpoint.
///
/// Either `fixed_monthly_costs` or `cost_breakdown` may be given, not both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    /// Age in whole years.
    pub age: i32,
    /// Whether a qualifying graduate credential was obtained domestically.
    #[serde(default)]
    pub has_qualifying_credential: bool,
    /// Gross monthly salary.
    pub gross_monthly_salary: Decimal,
    /// The date the relief period begins (YYYY-MM-DD).
    pub ruling_start_date: String,
    /// Number of calendar years to project.
    pub horizon_years: i32,
    /// Total fixed monthly costs.
    #[serde(default)]
    pub fixed_monthly_costs: Option<Decimal>,
    /// Fixed monthly costs by category.
    #[serde(default)]
    pub cost_breakdown: Option<CostBreakdownRequest>,
    /// Name of the eligibility profile; the configured default when absent.
    #[serde(default)]
    pub eligibility_profile: Option<String>,
}

/// Fixed monthly costs by category in a projection request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdownRequest {
    /// Monthly rent.
    pub rent: Decimal,
    /// Monthly utilities.
    pub utilities: Decimal,
    /// Monthly car costs.
    #[serde(default)]
    pub car: Decimal,
    /// Monthly health insurance premium.
    pub health_insurance: Decimal,
}

/// Request body for the `/eligibility` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityRequest {
    /// Age in whole years.
    pub age: i32,
    /// Whether a qualifying graduate credential was obtained domestically.
    #[serde(default)]
    pub has_qualifying_credential: bool,
    /// Gross monthly salary.
    pub gross_monthly_salary: Decimal,
    /// Name of the eligibility profile; the configured default when absent.
    #[serde(default)]
    pub eligibility_profile: Option<String>,
}

impl From<CostBreakdownRequest> for FixedCostBreakdown {
    fn from(req: CostBreakdownRequest) -> Self {
        FixedCostBreakdown {
            rent: req.rent,
            utilities: req.utilities,
            car: req.car,
            health_insurance: req.health_insurance,
        }
    }
}

impl From<ProjectionRequest> for ProjectionInput {
    fn from(req: ProjectionRequest) -> Self {
        ProjectionInput {
            age: req.age,
            has_qualifying_credential: req.has_qualifying_credential,
            gross_monthly_salary: req.gross_monthly_salary,
            ruling_start_date: req.ruling_start_date,
            horizon_years: req.horizon_years,
            fixed_monthly_costs: req.fixed_monthly_costs,
            cost_breakdown: req.cost_breakdown.map(Into::into),
            eligibility_profile: req.eligibility_profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_projection_request() {
        let json = r#"{
            "age": 32,
            "gross_monthly_salary": "6210",
            "ruling_start_date": "2026-01-01",
            "horizon_years": 10,
            "fixed_monthly_costs": "2000"
        }"#;

        let request: ProjectionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.age, 32);
        assert!(!request.has_qualifying_credential);
        assert_eq!(request.gross_monthly_salary, Decimal::from(6210));
        assert!(request.cost_breakdown.is_none());
        assert!(request.eligibility_profile.is_none());
    }

    #[test]
    fn test_deserialize_numeric_amounts() {
        let json = r#"{
            "age": 28,
            "has_qualifying_credential": true,
            "gross_monthly_salary": 4500.50,
            "ruling_start_date": "2025-07-01",
            "horizon_years": 5
        }"#;

        let request: ProjectionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.gross_monthly_salary,
            Decimal::from_str("4500.50").unwrap()
        );
    }

    #[test]
    fn test_projection_request_conversion() {
        let json = r#"{
            "age": 32,
            "gross_monthly_salary": "6210",
            "ruling_start_date": "2026-01-01",
            "horizon_years": 10,
            "cost_breakdown": {
                "rent": "1650",
                "utilities": "215.90",
                "health_insurance": "134.10"
            },
            "eligibility_profile": "taxable_salary"
        }"#;

        let request: ProjectionRequest = serde_json::from_str(json).unwrap();
        let input: ProjectionInput = request.into();
        let breakdown = input.cost_breakdown.unwrap();
        assert_eq!(breakdown.car, Decimal::ZERO);
        assert_eq!(breakdown.total(), Decimal::from(2000));
        assert_eq!(input.eligibility_profile.as_deref(), Some("taxable_salary"));
    }

    #[test]
    fn test_missing_salary_fails() {
        let json = r#"{
            "age": 32,
            "ruling_start_date": "2026-01-01",
            "horizon_years": 10
        }"#;
        let result: Result<ProjectionRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
