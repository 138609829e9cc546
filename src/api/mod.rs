//! HTTP API module for the Disposable Income Projection Engine.
//!
//! This module provides the REST API endpoints for projecting net and
//! disposable income and for checking ruling eligibility.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CostBreakdownRequest, EligibilityRequest, ProjectionRequest};
pub use response::{ApiError, EligibilityResponse};
pub use state::AppState;
