//! Response types for the roster engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::CacheStats;
use crate::error::EngineError;
use crate::models::SettlementResult;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::EmptyWorkRecords { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "EMPTY_WORK_RECORDS",
                    message,
                    "At least one work record is required to compute a payroll line",
                ),
            ),
            EngineError::InvalidTime { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("INVALID_TIME", message))
            }
            EngineError::InvalidAssignment { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_ASSIGNMENT", message),
            ),
            EngineError::InvalidSchedule { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_SCHEDULE",
                    message,
                    "Every assignment must sit on a slot of the day's grid",
                ),
            ),
            EngineError::CalculationError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

/// Response body for `POST /settlement/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementBatchResponse {
    /// One result per requested item, in order.
    pub results: Vec<SettlementResult>,
    /// Sum of total pay.
    pub total_pay: Decimal,
    /// Sum of after-tax pay.
    pub total_after_tax_pay: Decimal,
    /// Cache counters after the batch.
    pub cache: CacheStats,
}
