//! Calculation logic for the roster engine.
//!
//! This module contains the pure functions behind every engine operation:
//! time-slot utilities, schedule validation, work-record aggregation, payroll
//! with its daily overtime split and base rate lookup, delimited export, and
//! single-record settlement with tax and memoization.

mod base_rate;
mod daily_overtime;
mod export;
mod payroll;
mod schedule_validator;
mod settlement;
mod settlement_cache;
mod tax;
mod time_utils;
mod work_record;

pub use base_rate::{BaseRateLookupResult, get_base_rate};
pub use daily_overtime::{DEFAULT_DAILY_REGULAR_HOURS, DailyOvertimeDetection, detect_daily_overtime};
pub use export::{DELIMITER, EXPORT_COLUMNS, export_delimited, format_currency, format_hours};
pub use payroll::{
    MONTHLY_PERIOD_THRESHOLD_DAYS, aggregate_period, calculate_for_staff, compute_exceptions,
    round_currency, round_hours,
};
pub use schedule_validator::{
    SCHEDULE_GAP_THRESHOLD_MINUTES, check_continuous_work, check_rest_time, check_schedule_gaps,
    check_station_conflicts, validate,
};
pub use settlement::{
    SettlementInput, calculate_allowances, calculate_base_pay, calculate_total, hours_worked,
    salary_for_role, settle, settle_input,
};
pub use settlement_cache::{CacheStats, DEFAULT_CACHE_CAPACITY, SettlementCache, input_hash};
pub use tax::{TaxBreakdown, calculate_tax};
pub use time_utils::{
    DroppedAssignment, RemapOutcome, duration_between, duration_minutes, from_minutes,
    generate_grid, generate_slots, remap_assignments, slot_difference, to_minutes,
};
pub use work_record::{aggregate, aggregate_from_check_in_out};
