//! Base rate lookup functionality.
//!
//! Resolves a staff member's hourly base rate from the [`RateTable`] by job
//! role, falling back to the table's default role.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AuditStep, RateTable};

/// The result of a base rate lookup, including the rate and audit step.
#[derive(Debug, Clone)]
pub struct BaseRateLookupResult {
    /// The determined base hourly rate.
    pub rate: Decimal,
    /// The role whose rate was used.
    pub resolved_role: String,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Determines the base hourly rate for a job role.
///
/// Lookup order:
/// 1. The role's own entry in `rates.rates`
/// 2. The entry for `rates.default_role`
///
/// If neither exists the rate is zero. The lookup never fails; unknown
/// roles are logged at `warn` and recorded in the audit step.
///
/// # Examples
///
/// ```
/// use roster_engine::calculation::get_base_rate;
/// use roster_engine::models::RateTable;
/// use rust_decimal::Decimal;
///
/// let table = RateTable::default();
/// assert_eq!(get_base_rate("dealer", &table, 1).rate, Decimal::from(18000));
/// assert_eq!(get_base_rate("juggler", &table, 1).rate, Decimal::from(15000));
/// ```
pub fn get_base_rate(job_role: &str, rates: &RateTable, step_number: u32) -> BaseRateLookupResult {
    let (rate, resolved_role, source) = match rates.rates.get(job_role) {
        Some(rate) => (*rate, job_role.to_string(), "rate_table"),
        None => {
            let fallback = rates.rates.get(&rates.default_role).copied();
            warn!(
                job_role,
                default_role = %rates.default_role,
                found = fallback.is_some(),
                "Unknown job role, using default role rate"
            );
            match fallback {
                Some(rate) => (rate, rates.default_role.clone(), "default_role"),
                None => (Decimal::ZERO, rates.default_role.clone(), "missing"),
            }
        }
    };

    let reasoning = match source {
        "rate_table" => format!("Rate for role '{}' is {}", job_role, rate),
        "default_role" => format!(
            "Role '{}' not in rate table; using default role '{}' rate {}",
            job_role, resolved_role, rate
        ),
        _ => format!(
            "Neither role '{}' nor default role '{}' has a rate; using 0",
            job_role, resolved_role
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "base_rate_lookup".to_string(),
        rule_name: "Base Rate Lookup".to_string(),
        input: serde_json::json!({
            "job_role": job_role,
            "default_role": rates.default_role,
        }),
        output: serde_json::json!({
            "rate": rate.to_string(),
            "resolved_role": resolved_role,
            "source": source,
        }),
        reasoning,
    };

    BaseRateLookupResult {
        rate,
        resolved_role,
        audit_step,
    }
}
