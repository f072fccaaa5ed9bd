//! Payroll models: rate table, per-staff policy, payroll lines and period
//! summaries.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditStep, SalaryType, WorkRecord};

/// Rates by job role plus the overtime rules applied to them.
///
/// Passed explicitly into every payroll call; callers own any notion of
/// "current settings".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// Base rate per job role, per hour unless `salary_types` says otherwise.
    pub rates: BTreeMap<String, Decimal>,
    /// How each role's rate is applied. Roles not listed are hourly.
    #[serde(default)]
    pub salary_types: BTreeMap<String, SalaryType>,
    /// Role whose rate is used when a role is not in `rates`.
    pub default_role: String,
    /// Multiplier applied to the base rate for overtime hours.
    pub overtime_multiplier: Decimal,
    /// Regular hours per day before overtime starts.
    pub daily_regular_hours: Decimal,
}

impl Default for RateTable {
    fn default() -> Self {
        let rates = [
            ("dealer", 18000),
            ("manager", 25000),
            ("tournament_director", 30000),
            ("floor_supervisor", 22000),
            ("cashier", 16000),
            ("server", 15000),
            ("security", 20000),
            ("tech_support", 24000),
            ("default", 15000),
        ]
        .into_iter()
        .map(|(role, rate)| (role.to_string(), Decimal::from(rate)))
        .collect();

        Self {
            rates,
            salary_types: BTreeMap::new(),
            default_role: "default".to_string(),
            overtime_multiplier: Decimal::new(15, 1),
            daily_regular_hours: Decimal::from(8),
        }
    }
}

impl RateTable {
    /// How the rate for `role` is applied.
    pub fn salary_type_for(&self, role: &str) -> SalaryType {
        self.salary_types.get(role).copied().unwrap_or_default()
    }
}

/// Per-staff inputs to a payroll calculation that are not work records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPolicy {
    /// Name printed on exports.
    #[serde(default)]
    pub staff_name: String,
    /// Job role used for the rate lookup.
    #[serde(default)]
    pub job_role: String,
    /// Event or engagement label printed on exports.
    #[serde(default)]
    pub context: String,
    /// Cash allowance paid for every day worked.
    #[serde(default)]
    pub daily_allowance: Decimal,
    /// Extra pay added on top of hours.
    #[serde(default)]
    pub bonus_pay: Decimal,
    /// Amount withheld from pay.
    #[serde(default)]
    pub deduction: Decimal,
    /// Status assigned to the produced line.
    #[serde(default)]
    pub status: PayrollStatus,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            staff_name: String::new(),
            job_role: String::new(),
            context: String::new(),
            daily_allowance: Decimal::ZERO,
            bonus_pay: Decimal::ZERO,
            deduction: Decimal::ZERO,
            status: PayrollStatus::Draft,
        }
    }
}

/// Attendance exception counts for a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionCounts {
    /// Late arrivals.
    pub late: u32,
    /// Early departures.
    pub early_leave: u32,
    /// Absences.
    pub absence: u32,
    /// Overtime occurrences.
    pub overtime: u32,
}

impl ExceptionCounts {
    /// Late, early-leave and absence counts combined.
    pub fn attendance_total(&self) -> u32 {
        self.late
            .saturating_add(self.early_leave)
            .saturating_add(self.absence)
    }
}

impl std::ops::AddAssign for ExceptionCounts {
    fn add_assign(&mut self, other: Self) {
        self.late = self.late.saturating_add(other.late);
        self.early_leave = self.early_leave.saturating_add(other.early_leave);
        self.absence = self.absence.saturating_add(other.absence);
        self.overtime = self.overtime.saturating_add(other.overtime);
    }
}

/// Money breakdown of a payroll line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayBreakdown {
    /// The role's rate: per hour, per day or per period by salary type.
    pub base_rate: Decimal,
    /// Hourly rate for overtime hours; zero unless the role is hourly.
    pub overtime_rate: Decimal,
    /// Base pay: regular hours for hourly roles, otherwise the day or
    /// period amount.
    pub regular_pay: Decimal,
    /// Pay for overtime hours.
    pub overtime_pay: Decimal,
    /// Daily allowance times days worked.
    #[serde(default)]
    pub allowance_pay: Decimal,
    /// Bonus added.
    pub bonus_pay: Decimal,
    /// Deduction withheld.
    pub deduction: Decimal,
    /// Final pay, never negative.
    pub total_pay: Decimal,
}

/// Lifecycle state of a payroll line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Calculated, not yet reviewed.
    #[default]
    Draft,
    /// Reviewed and confirmed.
    Confirmed,
    /// Paid out.
    Paid,
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PayrollStatus::Draft => "Draft",
            PayrollStatus::Confirmed => "Confirmed",
            PayrollStatus::Paid => "Paid",
        })
    }
}

/// One staff member's payroll for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    /// The staff member.
    pub staff_id: String,
    /// Name printed on exports.
    pub staff_name: String,
    /// Event or engagement label.
    pub context: String,
    /// Job role the base rate was looked up for.
    pub job_role: String,
    /// How the role's rate was applied.
    #[serde(default)]
    pub salary_type: SalaryType,
    /// Earliest record date.
    pub period_start: NaiveDate,
    /// Latest record date.
    pub period_end: NaiveDate,
    /// Hours at or under the daily threshold.
    pub regular_hours: Decimal,
    /// Hours over the daily threshold.
    pub overtime_hours: Decimal,
    /// Regular plus overtime hours.
    pub total_hours: Decimal,
    /// Distinct dates with worked minutes.
    #[serde(default)]
    pub work_days: u32,
    /// Attendance exceptions for the period.
    pub exception_counts: ExceptionCounts,
    /// Money breakdown.
    pub pay: PayBreakdown,
    /// The records this line was computed from.
    pub daily_records: Vec<WorkRecord>,
    /// Lifecycle state.
    pub status: PayrollStatus,
    /// Decisions made while computing this line.
    #[serde(default)]
    pub audit_steps: Vec<AuditStep>,
}

/// Length class of a reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Roughly a week.
    Weekly,
    /// Roughly a month.
    Monthly,
}

/// Aggregate of many payroll lines over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Weekly or monthly.
    pub period_type: PeriodType,
    /// Earliest line start, if any lines were given.
    pub period_start: Option<NaiveDate>,
    /// Latest line end, if any lines were given.
    pub period_end: Option<NaiveDate>,
    /// Number of lines summarised.
    pub total_staff: usize,
    /// Sum of total hours.
    pub total_hours: Decimal,
    /// Sum of regular hours.
    pub regular_hours: Decimal,
    /// Sum of overtime hours.
    pub overtime_hours: Decimal,
    /// Sum of regular pay.
    pub regular_pay: Decimal,
    /// Sum of overtime pay.
    pub overtime_pay: Decimal,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Sum of total pay.
    pub total_pay: Decimal,
    /// Late, early-leave and absence counts across all lines.
    pub total_exceptions: u32,
    /// Exception counts across all lines.
    pub exception_summary: ExceptionCounts,
    /// Total hours per staff member.
    pub average_work_hours: Decimal,
    /// Total pay per staff member.
    pub average_pay: Decimal,
}
