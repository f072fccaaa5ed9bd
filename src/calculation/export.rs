//! Delimited-text export of payroll lines.

use rust_decimal::Decimal;

use crate::models::PayrollLine;

use super::payroll::{round_currency, round_hours};

/// Column headers in export order.
pub const EXPORT_COLUMNS: [&str; 16] = [
    "Name",
    "Context",
    "Period",
    "Regular Hours",
    "Overtime Hours",
    "Total Hours",
    "Late",
    "Early Leave",
    "Absence",
    "Overtime Count",
    "Base Pay",
    "Overtime Pay",
    "Bonus Pay",
    "Deduction",
    "Total Pay",
    "Status",
];

/// Field separator.
pub const DELIMITER: char = ',';

/// Renders payroll lines as delimited text.
///
/// The header row comes first, then one row per line in input order. Every
/// field is double-quoted with embedded quotes doubled. Currency is written
/// as comma-grouped whole units and hours with two decimals. Rows end with
/// `\n`.
///
/// # Example
///
/// ```
/// use roster_engine::calculation::{export_delimited, EXPORT_COLUMNS};
///
/// let text = export_delimited(&[]);
/// let header: Vec<String> = text
///     .lines()
///     .next()
///     .unwrap()
///     .split(',')
///     .map(|f| f.trim_matches('"').to_string())
///     .collect();
/// assert_eq!(header, EXPORT_COLUMNS);
/// ```
pub fn export_delimited(lines: &[PayrollLine]) -> String {
    let mut out = String::new();
    push_row(&mut out, EXPORT_COLUMNS.iter().map(|c| c.to_string()));

    for line in lines {
        let counts = &line.exception_counts;
        let row = [
            line.staff_name.clone(),
            line.context.clone(),
            format!(
                "{} ~ {}",
                line.period_start.format("%Y-%m-%d"),
                line.period_end.format("%Y-%m-%d")
            ),
            format_hours(line.regular_hours),
            format_hours(line.overtime_hours),
            format_hours(line.total_hours),
            counts.late.to_string(),
            counts.early_leave.to_string(),
            counts.absence.to_string(),
            counts.overtime.to_string(),
            format_currency(line.pay.regular_pay),
            format_currency(line.pay.overtime_pay),
            format_currency(line.pay.bonus_pay),
            format_currency(line.pay.deduction),
            format_currency(line.pay.total_pay),
            line.status.to_string(),
        ];
        push_row(&mut out, row.into_iter());
    }

    out
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    for (n, field) in fields.enumerate() {
        if n > 0 {
            out.push(DELIMITER);
        }
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    }
    out.push('\n');
}

/// Formats an amount as whole units with comma thousands separators.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (n, ch) in digits.chars().enumerate() {
        if n > 0 && (digits.len() - n) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats hours with exactly two decimal places.
pub fn format_hours(hours: Decimal) -> String {
    let mut rounded = round_hours(hours);
    rounded.rescale(2);
    rounded.to_string()
}
