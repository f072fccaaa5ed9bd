//! Single-record settlement: base pay, allowances, tax and after-tax pay.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    AllowanceCategory, AllowanceValue, Allowances, SalaryInfo, SalaryType, SettlementResult,
    TaxSettings, WorkRecord,
};

use super::payroll::{clamped_mul, round_currency, round_hours};
use super::tax::calculate_tax;
use super::time_utils::duration_between;

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Everything a settlement is computed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementInput {
    /// The work record being settled.
    pub record: WorkRecord,
    /// Salary configuration.
    #[serde(default)]
    pub salary: SalaryInfo,
    /// Allowance entries.
    #[serde(default)]
    pub allowances: Allowances,
    /// Tax configuration.
    #[serde(default)]
    pub tax: TaxSettings,
}

/// Hours between a record's effective start and end.
///
/// Actual times are used when present, scheduled times otherwise. A missing
/// start or end gives zero hours.
pub fn hours_worked(record: &WorkRecord) -> Decimal {
    match (record.effective_start(), record.effective_end()) {
        (Some(start), Some(end)) => {
            Decimal::from(duration_between(start, end)) / MINUTES_PER_HOUR
        }
        _ => Decimal::ZERO,
    }
}

/// Base pay for a salary over `hours`.
///
/// Hourly salaries pay `hours * amount` rounded to whole units. Daily,
/// monthly and other salaries pay the flat amount. A negative amount pays
/// nothing, and a product too large to represent is clamped.
pub fn calculate_base_pay(salary: &SalaryInfo, hours: Decimal) -> Decimal {
    if salary.amount < Decimal::ZERO {
        warn!(amount = %salary.amount, "Negative salary amount, paying 0");
        return Decimal::ZERO;
    }
    match salary.salary_type {
        SalaryType::Hourly => round_currency(clamped_mul(hours, salary.amount)),
        SalaryType::Daily | SalaryType::Monthly | SalaryType::Other => salary.amount,
    }
}

/// Cash allowance total plus the categories provided in kind.
///
/// Non-positive amounts contribute nothing.
pub fn calculate_allowances(allowances: &Allowances) -> (Decimal, Vec<AllowanceCategory>) {
    let mut total = Decimal::ZERO;
    let mut provided = Vec::new();
    for (category, value) in allowances {
        match value {
            AllowanceValue::Amount(amount) if *amount > Decimal::ZERO => {
                total = total.saturating_add(*amount)
            }
            AllowanceValue::Amount(_) => {}
            AllowanceValue::Provided => provided.push(*category),
        }
    }
    (total, provided)
}

/// Settles one work record.
///
/// A record with no measurable hours settles to all zeros whatever the
/// salary type. Otherwise total pay is base pay plus cash allowances and
/// after-tax pay is total pay less tax, floored at zero.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use chrono::NaiveDate;
/// use roster_engine::calculation::settle;
/// use roster_engine::models::{
///     Allowances, SalaryInfo, TaxSettings, TimeInput, WorkRecord, WorkStatus,
/// };
/// use rust_decimal::Decimal;
///
/// let record = WorkRecord {
///     id: "r1".to_string(),
///     staff_id: "s1".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
///     scheduled_start: Some(TimeInput::clock("09:00")),
///     scheduled_end: Some(TimeInput::clock("18:00")),
///     actual_start: None,
///     actual_end: None,
///     worked_minutes: 540,
///     break_minutes: 0,
///     stations_touched: BTreeSet::new(),
///     status: WorkStatus::Scheduled,
/// };
///
/// let result = settle(
///     &record,
///     &SalaryInfo::hourly(Decimal::from(15000)),
///     &Allowances::new(),
///     &TaxSettings::none(),
/// );
/// assert_eq!(result.base_pay, Decimal::from(135000));
/// assert!(result.is_estimate);
/// ```
pub fn settle(
    record: &WorkRecord,
    salary: &SalaryInfo,
    allowances: &Allowances,
    tax: &TaxSettings,
) -> SettlementResult {
    let is_estimate = record.is_estimate();
    let hours = hours_worked(record);

    if hours.is_zero() {
        debug!(record_id = %record.id, "No hours worked, settling to zero");
        return SettlementResult {
            is_estimate,
            ..SettlementResult::default()
        };
    }

    let base_pay = calculate_base_pay(salary, hours);
    let (allowance_pay, provided_in_kind) = calculate_allowances(allowances);
    let total_pay = base_pay.saturating_add(allowance_pay);
    let tax_amount = calculate_tax(base_pay, allowance_pay, tax).tax_amount;
    let after_tax_pay = total_pay.saturating_sub(tax_amount).max(Decimal::ZERO);

    debug!(
        record_id = %record.id,
        %hours,
        %base_pay,
        %allowance_pay,
        %tax_amount,
        is_estimate,
        "Record settled"
    );

    SettlementResult {
        hours_worked: round_hours(hours),
        base_pay,
        allowance_pay,
        tax_amount,
        total_pay,
        after_tax_pay,
        provided_in_kind,
        is_estimate,
    }
}

/// Settles one input.
pub fn settle_input(input: &SettlementInput) -> SettlementResult {
    settle(&input.record, &input.salary, &input.allowances, &input.tax)
}

/// Sums total pay, or after-tax pay when `after_tax` is set, across inputs.
pub fn calculate_total(inputs: &[SettlementInput], after_tax: bool) -> Decimal {
    inputs
        .iter()
        .map(settle_input)
        .map(|r| if after_tax { r.after_tax_pay } else { r.total_pay })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Resolves the salary for a role.
///
/// An explicit `override_salary` wins, then the role's entry in
/// `role_salaries`, then `default`.
pub fn salary_for_role(
    role: Option<&str>,
    role_salaries: &BTreeMap<String, SalaryInfo>,
    override_salary: Option<SalaryInfo>,
    default: SalaryInfo,
) -> SalaryInfo {
    override_salary
        .or_else(|| role.and_then(|r| role_salaries.get(r).copied()))
        .unwrap_or(default)
}
