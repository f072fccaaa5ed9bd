//! Core data models for the roster engine.
//!
//! This module contains the plain records the calculation core consumes from
//! and returns to the surrounding application.

mod audit;
mod payroll;
mod schedule;
mod settlement;
mod time_slot;
mod validation;
mod work_record;

pub use audit::AuditStep;
pub use payroll::{
    ExceptionCounts, PayBreakdown, PayrollLine, PayrollPolicy, PayrollStatus, PeriodSummary,
    PeriodType, RateTable,
};
pub use schedule::{Assignment, RuleConfig, ScheduleGrid, StaffSchedule};
pub use settlement::{
    AllowanceCategory, AllowanceValue, Allowances, SalaryInfo, SalaryType, SettlementResult,
    TaxMethod, TaxSettings, TaxableItems,
};
pub use time_slot::{MINUTES_PER_DAY, TimeSlot};
pub use validation::{Severity, ValidationResult, ValidationViolation, ViolationKind};
pub use work_record::{CheckInOut, TimeInput, WorkRecord, WorkStatus};
