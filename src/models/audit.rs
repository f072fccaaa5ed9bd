//! Audit trail records attached to payroll calculations.

use serde::{Deserialize, Serialize};

/// A single step in the audit trail recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use roster_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "base_rate_lookup".to_string(),
///     rule_name: "Base Rate Lookup".to_string(),
///     input: serde_json::json!({"role": "dealer"}),
///     output: serde_json::json!({"rate": "18000"}),
///     reasoning: "Rate for role 'dealer' found in rate table".to_string(),
/// };
/// assert_eq!(step.rule_id, "base_rate_lookup");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
