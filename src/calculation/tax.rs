//! Tax withholding for a single settlement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{TaxMethod, TaxSettings};

use super::payroll::{clamped_mul, round_currency};

const PERCENT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// The tax computed for one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Amount a percentage rate was applied to; zero for other methods.
    pub taxable_base: Decimal,
    /// Tax withheld, whole units, never negative.
    pub tax_amount: Decimal,
}

/// Computes the tax on a settlement's base and allowance pay.
///
/// - `None` withholds nothing.
/// - `PercentageRate` applies `rate` percent to base pay and/or allowance pay
///   as selected by `taxable_items`, rounded to whole units.
/// - `FixedAmount` withholds the configured amount once, whatever the pay.
///
/// # Example
///
/// ```
/// use roster_engine::calculation::calculate_tax;
/// use roster_engine::models::{TaxMethod, TaxSettings, TaxableItems};
/// use rust_decimal::Decimal;
///
/// let tax = TaxSettings {
///     method: TaxMethod::PercentageRate { rate: Decimal::from(10) },
///     taxable_items: TaxableItems { base: true, allowances: false },
/// };
/// let result = calculate_tax(Decimal::from(135000), Decimal::from(20000), &tax);
/// assert_eq!(result.tax_amount, Decimal::from(13500));
/// ```
pub fn calculate_tax(base_pay: Decimal, allowance_pay: Decimal, tax: &TaxSettings) -> TaxBreakdown {
    match tax.method {
        TaxMethod::None => TaxBreakdown {
            taxable_base: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
        },
        TaxMethod::PercentageRate { rate } => {
            let mut taxable_base = Decimal::ZERO;
            if tax.taxable_items.base {
                taxable_base = taxable_base.saturating_add(base_pay);
            }
            if tax.taxable_items.allowances {
                taxable_base = taxable_base.saturating_add(allowance_pay);
            }
            let tax_amount =
                round_currency(clamped_mul(taxable_base, rate) / PERCENT).max(Decimal::ZERO);
            TaxBreakdown {
                taxable_base,
                tax_amount,
            }
        }
        TaxMethod::FixedAmount { amount } => TaxBreakdown {
            taxable_base: Decimal::ZERO,
            tax_amount: amount.max(Decimal::ZERO),
        },
    }
}
