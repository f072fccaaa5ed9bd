//! HTTP API module for the roster engine.
//!
//! This module exposes schedule validation, work-record aggregation, payroll
//! and settlement over JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AggregateRequest, PayrollExportRequest, PayrollStaffRequest, PayrollSummaryRequest,
    SettlementBatchRequest, SettlementRequest, ValidateRequest,
};
pub use response::{ApiError, ApiErrorResponse, SettlementBatchResponse};
pub use state::AppState;
