//! Single-record settlement models: salary, allowances, tax and the result.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a salary amount is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryType {
    /// Amount per hour worked.
    #[default]
    Hourly,
    /// Flat amount per day worked.
    Daily,
    /// Flat amount per engagement.
    Monthly,
    /// Manually agreed figure, paid like a day rate.
    Other,
}

/// A salary configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalaryInfo {
    /// How `amount` is applied.
    #[serde(rename = "type")]
    pub salary_type: SalaryType,
    /// The configured amount.
    pub amount: Decimal,
}

impl SalaryInfo {
    /// An hourly salary.
    pub fn hourly(amount: Decimal) -> Self {
        Self {
            salary_type: SalaryType::Hourly,
            amount,
        }
    }
}

impl Default for SalaryInfo {
    fn default() -> Self {
        Self::hourly(Decimal::from(15000))
    }
}

/// Allowance categories paid alongside base pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceCategory {
    /// Meals.
    Meal,
    /// Travel to and from the venue.
    Transportation,
    /// Lodging.
    Accommodation,
    /// Any extra agreed amount.
    Additional,
}

/// The value of one allowance entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceValue {
    /// Paid in cash.
    Amount(Decimal),
    /// Provided in kind; carries no cash value.
    Provided,
}

/// Allowance entries by category.
pub type Allowances = BTreeMap<AllowanceCategory, AllowanceValue>;

/// Which pay components a percentage tax applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxableItems {
    /// Tax base pay.
    pub base: bool,
    /// Tax cash allowances.
    pub allowances: bool,
}

impl Default for TaxableItems {
    fn default() -> Self {
        Self {
            base: true,
            allowances: true,
        }
    }
}

/// How tax is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaxMethod {
    /// No tax.
    None,
    /// A percentage of the taxable base, `rate` given in percent.
    PercentageRate {
        /// Percent, e.g. `3.3`.
        rate: Decimal,
    },
    /// A flat amount per settlement.
    FixedAmount {
        /// The amount withheld.
        amount: Decimal,
    },
}

/// Tax configuration for a settlement.
///
/// # Example
///
/// ```
/// use roster_engine::models::{TaxMethod, TaxSettings};
/// use rust_decimal::Decimal;
///
/// let tax: TaxSettings = serde_json::from_str(
///     r#"{"type": "percentage_rate", "rate": "3.3", "taxable_items": {"base": true, "allowances": false}}"#,
/// ).unwrap();
/// assert_eq!(tax.method, TaxMethod::PercentageRate { rate: Decimal::new(33, 1) });
/// assert!(!tax.taxable_items.allowances);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxSettings {
    /// How tax is computed.
    #[serde(flatten)]
    pub method: TaxMethod,
    /// Components a percentage tax applies to.
    #[serde(default)]
    pub taxable_items: TaxableItems,
}

impl TaxSettings {
    /// No tax at all.
    pub fn none() -> Self {
        Self {
            method: TaxMethod::None,
            taxable_items: TaxableItems::default(),
        }
    }
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self::none()
    }
}

/// The computed pay and tax for one work record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Hours between effective start and end, two decimals.
    pub hours_worked: Decimal,
    /// Pay from the salary configuration.
    pub base_pay: Decimal,
    /// Cash allowances.
    pub allowance_pay: Decimal,
    /// Tax withheld.
    pub tax_amount: Decimal,
    /// Base pay plus allowances.
    pub total_pay: Decimal,
    /// Total pay less tax, never negative.
    pub after_tax_pay: Decimal,
    /// Allowances provided in kind, for display.
    #[serde(default)]
    pub provided_in_kind: Vec<AllowanceCategory>,
    /// True when scheduled times stood in for missing actual times.
    #[serde(default)]
    pub is_estimate: bool,
}
