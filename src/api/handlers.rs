//! HTTP request handlers for the roster engine API.
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
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    aggregate, aggregate_from_check_in_out, aggregate_period, calculate_for_staff,
    export_delimited, validate,
};

use super::request::{
    AggregateRequest, PayrollExportRequest, PayrollStaffRequest, PayrollSummaryRequest,
    SettlementBatchRequest, SettlementRequest, ValidateRequest,
};
use super::response::{ApiError, ApiErrorResponse, SettlementBatchResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/schedule/validate", post(validate_handler))
        .route("/schedule/aggregate", post(aggregate_handler))
        .route("/payroll/staff", post(payroll_staff_handler))
        .route("/payroll/summary", post(payroll_summary_handler))
        .route("/payroll/export", post(payroll_export_handler))
        .route("/settlement", post(settlement_handler))
        .route("/settlement/batch", post(settlement_batch_handler))
        .with_state(state)
}

/// Handler for POST /schedule/validate.
///
/// Rejects schedules with assignments off the grid, then validates them.
async fn validate_handler(
    State(state): State<AppState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing schedule validation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let grid = request.grid.unwrap_or(*state.config().grid());
    let rules = request.rules.unwrap_or(*state.config().rules());
    let slots = grid.slots();

    for schedule in &request.schedules {
        if let Err(err) = schedule.ensure_on_grid(&slots) {
            warn!(correlation_id = %correlation_id, error = %err, "Schedule rejected");
            return error_response(err.into());
        }
    }

    let result = validate(&request.schedules, &slots, &rules);
    info!(
        correlation_id = %correlation_id,
        staff_count = request.schedules.len(),
        violations = result.violations.len(),
        is_valid = result.is_valid,
        duration_us = start_time.elapsed().as_micros(),
        "Schedule validation completed"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /schedule/aggregate.
async fn aggregate_handler(
    State(state): State<AppState>,
    payload: Result<Json<AggregateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing aggregation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let record = match request {
        AggregateRequest {
            check_in_out: Some(check_in_out),
            ..
        } => aggregate_from_check_in_out(&check_in_out),
        AggregateRequest {
            schedule: Some(schedule),
            date: Some(date),
            grid,
            ..
        } => {
            let grid = grid.unwrap_or(*state.config().grid());
            aggregate(&schedule, date, &grid.slots(), grid.interval_minutes)
        }
        _ => {
            warn!(correlation_id = %correlation_id, "Aggregation request missing inputs");
            return json_response(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(
                    "either check_in_out, or schedule together with date, is required",
                ),
            );
        }
    };

    info!(
        correlation_id = %correlation_id,
        record_id = %record.id,
        worked_minutes = record.worked_minutes,
        "Aggregation completed"
    );
    json_response(StatusCode::OK, record)
}

/// Handler for POST /payroll/staff.
async fn payroll_staff_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollStaffRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let rates = request
        .rates
        .as_ref()
        .unwrap_or_else(|| state.config().rate_table());

    match calculate_for_staff(&request.staff_id, &request.records, rates, &request.policy) {
        Ok(line) => {
            info!(
                correlation_id = %correlation_id,
                staff_id = %line.staff_id,
                records = request.records.len(),
                total_pay = %line.pay.total_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll calculation completed"
            );
            json_response(StatusCode::OK, line)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Payroll calculation failed");
            error_response(err.into())
        }
    }
}

/// Handler for POST /payroll/summary.
async fn payroll_summary_handler(
    payload: Result<Json<PayrollSummaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll summary request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let summary = aggregate_period(&request.lines, request.period_type);
    info!(
        correlation_id = %correlation_id,
        total_staff = summary.total_staff,
        total_pay = %summary.total_pay,
        "Payroll summary completed"
    );
    json_response(StatusCode::OK, summary)
}

/// Handler for POST /payroll/export.
///
/// Responds with `text/csv`.
async fn payroll_export_handler(
    payload: Result<Json<PayrollExportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll export request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let body = export_delimited(&request.lines);
    info!(
        correlation_id = %correlation_id,
        rows = request.lines.len(),
        bytes = body.len(),
        "Payroll export completed"
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Handler for POST /settlement.
async fn settlement_handler(
    State(state): State<AppState>,
    payload: Result<Json<SettlementRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing settlement request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let input = request.into_input(state.config());
    let result = state.settle(&input);
    info!(
        correlation_id = %correlation_id,
        record_id = %input.record.id,
        total_pay = %result.total_pay,
        after_tax_pay = %result.after_tax_pay,
        duration_us = start_time.elapsed().as_micros(),
        "Settlement completed"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for POST /settlement/batch.
async fn settlement_batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<SettlementBatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing settlement batch request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let inputs: Vec<_> = request
        .items
        .into_iter()
        .map(|item| item.into_input(state.config()))
        .collect();
    let (results, cache) = state.settle_batch(&inputs);

    let total_pay = results
        .iter()
        .map(|r| r.total_pay)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let total_after_tax_pay = results
        .iter()
        .map(|r| r.after_tax_pay)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    info!(
        correlation_id = %correlation_id,
        items = results.len(),
        cache_hits = cache.hits,
        %total_pay,
        duration_us = start_time.elapsed().as_micros(),
        "Settlement batch completed"
    );
    json_response(
        StatusCode::OK,
        SettlementBatchResponse {
            results,
            total_pay,
            total_after_tax_pay,
            cache,
        },
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message.
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
    json_response(StatusCode::BAD_REQUEST, error)
}
