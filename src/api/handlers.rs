//! HTTP request handlers for the Disposable Income Projection Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{compute_disposable_income_projection, evaluate_eligibility};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{ProjectionInput, annualise_monthly_salary};

use super::request::{EligibilityRequest, ProjectionRequest};
use super::response::{ApiError, ApiErrorResponse, EligibilityResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/projection", post(projection_handler))
        .route("/eligibility", post(eligibility_handler))
        .with_state(state)
}

/// Turns a JSON extraction failure into a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // serde's message names the offending field
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request rejected"
    );
    let api_error: ApiErrorResponse = err.into();
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

/// Handler for POST /projection endpoint.
///
/// Accepts a taxpayer profile and returns the yearly income projection.
async fn projection_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProjectionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing projection request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let input: ProjectionInput = request.into();
    let start_time = Instant::now();
    match compute_disposable_income_projection(&input, state.config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                calculation_id = %result.calculation_id,
                is_eligible = result.eligibility.is_eligible,
                years = result.years.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Projection completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn check_eligibility(
    request: &EligibilityRequest,
    config: &ConfigLoader,
) -> EngineResult<EligibilityResponse> {
    let age = u32::try_from(request.age)
        .map_err(|_| EngineError::invalid_input("age", "must not be negative"))?;
    if request.gross_monthly_salary < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "gross_monthly_salary",
            "must not be negative",
        ));
    }

    let profile_name = request
        .eligibility_profile
        .as_deref()
        .unwrap_or_else(|| config.default_profile_name());
    let profile = config.eligibility_profile(Some(profile_name))?;

    let result = evaluate_eligibility(
        age,
        request.has_qualifying_credential,
        annualise_monthly_salary(request.gross_monthly_salary)?,
        profile,
        1,
    )?;

    Ok(EligibilityResponse {
        is_eligible: result.eligibility.is_eligible,
        path: result.eligibility.path,
        profile: profile_name.to_string(),
    })
}

/// Handler for POST /eligibility endpoint.
///
/// Answers whether a taxpayer qualifies for the ruling without projecting.
async fn eligibility_handler(
    State(state): State<AppState>,
    payload: Result<Json<EligibilityRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing eligibility request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match check_eligibility(&request, state.config()) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                is_eligible = response.is_eligible,
                profile = %response.profile,
                "Eligibility checked"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Err(err) => error_response(correlation_id, err),
    }
}
