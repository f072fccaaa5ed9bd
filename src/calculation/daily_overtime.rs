//! Daily overtime detection functionality.
//!
//! Splits one day's worked minutes into regular and overtime portions
//! against the per-day regular-hours threshold.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::AuditStep;

/// The result of detecting daily overtime for one day.
///
/// Minutes are kept as decimals so a fractional-hour threshold (for example
/// 7.5 hours) splits exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOvertimeDetection {
    /// The day the split applies to.
    pub date: NaiveDate,
    /// Minutes up to the threshold.
    pub regular_minutes: Decimal,
    /// Minutes exceeding the threshold (can be zero).
    pub overtime_minutes: Decimal,
    /// The audit step recording this detection.
    pub audit_step: AuditStep,
}

/// Default regular hours per day before overtime starts.
pub const DEFAULT_DAILY_REGULAR_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Detects whether a day's worked minutes exceed the regular-hours threshold.
///
/// Minutes at or under `threshold_hours` are regular; anything beyond is
/// overtime. A negative threshold is treated as zero.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use roster_engine::calculation::{detect_daily_overtime, DEFAULT_DAILY_REGULAR_HOURS};
/// use rust_decimal::Decimal;
///
/// let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let result = detect_daily_overtime(day, 600, DEFAULT_DAILY_REGULAR_HOURS, 1);
///
/// assert_eq!(result.regular_minutes, Decimal::from(480));
/// assert_eq!(result.overtime_minutes, Decimal::from(120));
/// ```
pub fn detect_daily_overtime(
    date: NaiveDate,
    worked_minutes: u32,
    threshold_hours: Decimal,
    step_number: u32,
) -> DailyOvertimeDetection {
    let worked = Decimal::from(worked_minutes);
    // A threshold too large to express in minutes never reaches overtime.
    let threshold = threshold_hours
        .max(Decimal::ZERO)
        .checked_mul(Decimal::from(60))
        .unwrap_or(Decimal::MAX);

    let regular_minutes = worked.min(threshold);
    let overtime_minutes = (worked - threshold).max(Decimal::ZERO);

    let reasoning = if overtime_minutes > Decimal::ZERO {
        format!(
            "{} minutes worked on {} exceeds the {} minute threshold by {} minutes",
            worked,
            date,
            threshold.normalize(),
            overtime_minutes.normalize()
        )
    } else {
        format!(
            "{} minutes worked on {} is within the {} minute threshold",
            worked,
            date,
            threshold.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "daily_overtime_detection".to_string(),
        rule_name: "Daily Overtime Detection".to_string(),
        input: serde_json::json!({
            "date": date.to_string(),
            "worked_minutes": worked_minutes,
            "threshold_hours": threshold_hours.normalize().to_string()
        }),
        output: serde_json::json!({
            "regular_minutes": regular_minutes.normalize().to_string(),
            "overtime_minutes": overtime_minutes.normalize().to_string()
        }),
        reasoning,
    };

    DailyOvertimeDetection {
        date,
        regular_minutes,
        overtime_minutes,
        audit_step,
    }
}
