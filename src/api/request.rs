//! Request types for the roster engine API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::SettlementInput;
use crate::config::ConfigLoader;
use crate::models::{
    Allowances, CheckInOut, PayrollLine, PayrollPolicy, PeriodType, RateTable, RuleConfig,
    SalaryInfo, ScheduleGrid, StaffSchedule, TaxSettings, WorkRecord,
};

/// Request body for `POST /schedule/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// The day's schedules.
    pub schedules: Vec<StaffSchedule>,
    /// Slot grid; the configured grid when absent.
    #[serde(default)]
    pub grid: Option<ScheduleGrid>,
    /// Rule overrides; the configured rules when absent.
    #[serde(default)]
    pub rules: Option<RuleConfig>,
}

/// Request body for `POST /schedule/aggregate`.
///
/// Either `check_in_out`, or `schedule` together with `date`, must be given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateRequest {
    /// Schedule to aggregate.
    #[serde(default)]
    pub schedule: Option<StaffSchedule>,
    /// Day the schedule covers.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Slot grid; the configured grid when absent.
    #[serde(default)]
    pub grid: Option<ScheduleGrid>,
    /// Raw check-in/out data, used instead of a schedule.
    #[serde(default)]
    pub check_in_out: Option<CheckInOut>,
}

/// Request body for `POST /payroll/staff`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollStaffRequest {
    /// The staff member.
    pub staff_id: String,
    /// Their work records for the period.
    pub records: Vec<WorkRecord>,
    /// Name, role, bonus and deduction.
    #[serde(default)]
    pub policy: PayrollPolicy,
    /// Rate table override; the configured table when absent.
    #[serde(default)]
    pub rates: Option<RateTable>,
}

/// Request body for `POST /payroll/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollSummaryRequest {
    /// Lines to summarise.
    pub lines: Vec<PayrollLine>,
    /// Period type; inferred from the date span when absent.
    #[serde(default)]
    pub period_type: Option<PeriodType>,
}

/// Request body for `POST /payroll/export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollExportRequest {
    /// Lines to export, in row order.
    pub lines: Vec<PayrollLine>,
}

/// Request body for `POST /settlement`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// The work record to settle.
    pub record: WorkRecord,
    /// Job role used to pick a configured salary.
    #[serde(default)]
    pub role: Option<String>,
    /// Explicit salary; wins over the role salary.
    #[serde(default)]
    pub salary: Option<SalaryInfo>,
    /// Allowance entries.
    #[serde(default)]
    pub allowances: Allowances,
    /// Tax settings; the configured default when absent.
    #[serde(default)]
    pub tax: Option<TaxSettings>,
}

impl SettlementRequest {
    /// Resolves salary and tax against the configuration.
    pub fn into_input(self, config: &ConfigLoader) -> SettlementInput {
        let salary = config.salary_for(self.role.as_deref(), self.salary);
        SettlementInput {
            record: self.record,
            salary,
            allowances: self.allowances,
            tax: self.tax.unwrap_or_else(|| config.default_tax()),
        }
    }
}

/// Request body for `POST /settlement/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementBatchRequest {
    /// Records to settle, in order.
    pub items: Vec<SettlementRequest>,
}
