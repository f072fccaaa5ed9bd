//! Payroll calculation for a staff member over a period, and period
//! summaries across many staff.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, ExceptionCounts, PayBreakdown, PayrollLine, PayrollPolicy, PeriodSummary,
    PeriodType, RateTable, SalaryType, WorkRecord,
};

use super::base_rate::get_base_rate;
use super::daily_overtime::detect_daily_overtime;

/// Periods spanning more than this many days are summarised as monthly.
pub const MONTHLY_PERIOD_THRESHOLD_DAYS: i64 = 20;

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Rounds a money amount to whole currency units, halves away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an hour quantity to two decimal places, halves away from zero.
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Multiplies two amounts, clamping to the representable range on overflow.
pub(crate) fn clamped_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| {
        warn!(%a, %b, "Amount out of range, clamping");
        if a.is_sign_negative() == b.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

/// Calculates one staff member's payroll line from their work records.
///
/// Records are grouped by date and each day's worked minutes are split into
/// regular and overtime portions against `rates.daily_regular_hours`. For an
/// hourly role pay is
///
/// ```text
/// regular_hours * base_rate
///   + overtime_hours * base_rate * overtime_multiplier
///   + daily_allowance * work_days
///   + bonus_pay - deduction
/// ```
///
/// floored at zero and rounded to whole units. Daily and other roles are paid
/// `base_rate * work_days` and monthly roles `base_rate` once, with no
/// overtime pay; hours are still split and reported. `work_days` counts the
/// distinct dates with worked minutes. The base rate is looked up by
/// `policy.job_role`, falling back to the table's default role. Amounts too
/// large to represent are clamped rather than panicking.
///
/// # Errors
///
/// Returns [`EngineError::EmptyWorkRecords`] when `records` is empty.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use chrono::NaiveDate;
/// use roster_engine::calculation::calculate_for_staff;
/// use roster_engine::models::{PayrollPolicy, RateTable, WorkRecord, WorkStatus};
/// use rust_decimal::Decimal;
///
/// let record = WorkRecord {
///     id: "r1".to_string(),
///     staff_id: "s1".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
///     scheduled_start: None,
///     scheduled_end: None,
///     actual_start: None,
///     actual_end: None,
///     worked_minutes: 600,
///     break_minutes: 0,
///     stations_touched: BTreeSet::new(),
///     status: WorkStatus::Completed,
/// };
///
/// let line = calculate_for_staff("s1", &[record], &RateTable::default(), &PayrollPolicy::default())
///     .unwrap();
/// assert_eq!(line.regular_hours, Decimal::from(8));
/// assert_eq!(line.overtime_hours, Decimal::from(2));
/// ```
pub fn calculate_for_staff(
    staff_id: &str,
    records: &[WorkRecord],
    rates: &RateTable,
    policy: &PayrollPolicy,
) -> EngineResult<PayrollLine> {
    let (Some(period_start), Some(period_end)) = (
        records.iter().map(|r| r.date).min(),
        records.iter().map(|r| r.date).max(),
    ) else {
        return Err(EngineError::EmptyWorkRecords {
            staff_id: staff_id.to_string(),
        });
    };

    let mut audit_steps: Vec<AuditStep> = Vec::new();
    let mut step_number = 1;

    let base_rate = get_base_rate(&policy.job_role, rates, step_number);
    audit_steps.push(base_rate.audit_step);
    step_number += 1;

    let mut minutes_by_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for record in records {
        let day = minutes_by_day.entry(record.date).or_default();
        *day = day.saturating_add(record.worked_minutes);
    }
    let work_days = minutes_by_day.values().filter(|m| **m > 0).count() as u32;

    let mut regular_minutes = Decimal::ZERO;
    let mut overtime_minutes = Decimal::ZERO;
    for (date, worked) in &minutes_by_day {
        let detection =
            detect_daily_overtime(*date, *worked, rates.daily_regular_hours, step_number);
        step_number += 1;
        regular_minutes += detection.regular_minutes;
        overtime_minutes += detection.overtime_minutes;
        audit_steps.push(detection.audit_step);
    }

    let salary_type = rates.salary_type_for(&base_rate.resolved_role);
    let (overtime_rate, regular_pay, overtime_pay) = match salary_type {
        SalaryType::Hourly => {
            let overtime_rate = clamped_mul(base_rate.rate, rates.overtime_multiplier);
            (
                overtime_rate,
                round_currency(clamped_mul(regular_minutes, base_rate.rate) / MINUTES_PER_HOUR),
                round_currency(clamped_mul(overtime_minutes, overtime_rate) / MINUTES_PER_HOUR),
            )
        }
        SalaryType::Daily | SalaryType::Other => (
            Decimal::ZERO,
            round_currency(clamped_mul(base_rate.rate, Decimal::from(work_days))),
            Decimal::ZERO,
        ),
        SalaryType::Monthly => (Decimal::ZERO, round_currency(base_rate.rate), Decimal::ZERO),
    };

    if salary_type != SalaryType::Hourly {
        audit_steps.push(AuditStep {
            step_number,
            rule_id: "period_base_pay".to_string(),
            rule_name: "Period Base Pay".to_string(),
            input: serde_json::json!({
                "salary_type": salary_type,
                "rate": base_rate.rate.to_string(),
                "work_days": work_days,
            }),
            output: serde_json::json!({
                "base_pay": regular_pay.to_string(),
            }),
            reasoning: match salary_type {
                SalaryType::Monthly => {
                    format!("Monthly role paid {} once for the period", base_rate.rate)
                }
                _ => format!(
                    "{:?} role paid {} for each of {} days worked",
                    salary_type, base_rate.rate, work_days
                ),
            },
        });
        step_number += 1;
    }

    let allowance_pay = round_currency(clamped_mul(
        policy.daily_allowance.max(Decimal::ZERO),
        Decimal::from(work_days),
    ));
    let gross = regular_pay
        .saturating_add(overtime_pay)
        .saturating_add(allowance_pay)
        .saturating_add(policy.bonus_pay)
        .saturating_sub(policy.deduction);
    let total_pay = round_currency(gross.max(Decimal::ZERO));

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "pay_total".to_string(),
        rule_name: "Pay Total".to_string(),
        input: serde_json::json!({
            "regular_pay": regular_pay.to_string(),
            "overtime_pay": overtime_pay.to_string(),
            "allowance_pay": allowance_pay.to_string(),
            "bonus_pay": policy.bonus_pay.to_string(),
            "deduction": policy.deduction.to_string(),
        }),
        output: serde_json::json!({
            "total_pay": total_pay.to_string(),
        }),
        reasoning: if gross < Decimal::ZERO {
            format!("Deduction exceeds earnings by {}; pay floored at 0", -gross)
        } else {
            format!(
                "{} regular + {} overtime + {} allowance + {} bonus - {} deduction = {}",
                regular_pay,
                overtime_pay,
                allowance_pay,
                policy.bonus_pay,
                policy.deduction,
                total_pay
            )
        },
    });

    let regular_hours = round_hours(regular_minutes / MINUTES_PER_HOUR);
    let overtime_hours = round_hours(overtime_minutes / MINUTES_PER_HOUR);

    let mut daily_records = records.to_vec();
    daily_records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    info!(
        staff_id,
        work_days,
        ?salary_type,
        %regular_hours,
        %overtime_hours,
        %total_pay,
        "Payroll calculated"
    );

    Ok(PayrollLine {
        staff_id: staff_id.to_string(),
        staff_name: if policy.staff_name.is_empty() {
            staff_id.to_string()
        } else {
            policy.staff_name.clone()
        },
        context: policy.context.clone(),
        job_role: base_rate.resolved_role,
        salary_type,
        period_start,
        period_end,
        regular_hours,
        overtime_hours,
        total_hours: regular_hours + overtime_hours,
        work_days,
        exception_counts: compute_exceptions(records),
        pay: PayBreakdown {
            base_rate: base_rate.rate,
            overtime_rate,
            regular_pay,
            overtime_pay,
            allowance_pay,
            bonus_pay: policy.bonus_pay,
            deduction: policy.deduction,
            total_pay,
        },
        daily_records,
        status: policy.status,
        audit_steps,
    })
}

/// Attendance exception counts for a set of records.
///
/// Exception detection is switched off: the counts are always zero. Callers
/// rely on the structure being present.
pub fn compute_exceptions(_records: &[WorkRecord]) -> ExceptionCounts {
    ExceptionCounts::default()
}

/// Sums many payroll lines into a period summary.
///
/// When `period_type` is `None` it is inferred from the span between the
/// earliest line start and the latest line end: more than
/// [`MONTHLY_PERIOD_THRESHOLD_DAYS`] days is monthly, anything else weekly.
/// Averages are zero when there are no lines.
pub fn aggregate_period(lines: &[PayrollLine], period_type: Option<PeriodType>) -> PeriodSummary {
    let period_start = lines.iter().map(|l| l.period_start).min();
    let period_end = lines.iter().map(|l| l.period_end).max();

    let period_type = period_type.unwrap_or(match (period_start, period_end) {
        (Some(start), Some(end)) if (end - start).num_days() > MONTHLY_PERIOD_THRESHOLD_DAYS => {
            PeriodType::Monthly
        }
        _ => PeriodType::Weekly,
    });

    let sum = |f: fn(&PayrollLine) -> Decimal| {
        lines.iter().map(f).fold(Decimal::ZERO, Decimal::saturating_add)
    };
    let total_hours = sum(|l| l.total_hours);
    let total_pay = sum(|l| l.pay.total_pay);

    let mut exception_summary = ExceptionCounts::default();
    for line in lines {
        exception_summary += line.exception_counts;
    }

    let total_staff = lines.len();
    let (average_work_hours, average_pay) = if total_staff == 0 {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let staff = Decimal::from(total_staff);
        (round_hours(total_hours / staff), round_currency(total_pay / staff))
    };

    debug!(total_staff, ?period_type, %total_pay, "Period summarised");

    PeriodSummary {
        period_type,
        period_start,
        period_end,
        total_staff,
        total_hours,
        regular_hours: sum(|l| l.regular_hours),
        overtime_hours: sum(|l| l.overtime_hours),
        regular_pay: sum(|l| l.pay.regular_pay),
        overtime_pay: sum(|l| l.pay.overtime_pay),
        total_deductions: sum(|l| l.pay.deduction),
        total_pay,
        total_exceptions: exception_summary.attendance_total(),
        exception_summary,
        average_work_hours,
        average_pay,
    }
}
