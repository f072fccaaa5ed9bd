//! Schedule validation result models.

use serde::{Deserialize, Serialize};

use super::TimeSlot;

/// The rule a violation was raised by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Too many staff on one station in one slot.
    StationConflict,
    /// An active run longer than the configured maximum.
    ContinuousWork,
    /// Too little rest between two active slots.
    InsufficientRest,
    /// A long unassigned stretch after the staff member has started.
    ScheduleGap,
}

/// How serious a violation is. Only `Error` makes a schedule invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational only.
    Info,
    /// Should be reviewed.
    Warning,
    /// Blocks the schedule from being valid.
    Error,
}

/// A single rule violation found in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationViolation {
    /// The rule that raised this violation.
    pub kind: ViolationKind,
    /// How serious the violation is.
    pub severity: Severity,
    /// The staff member concerned.
    pub staff_id: String,
    /// The slot the violation is anchored to.
    pub slot: TimeSlot,
    /// Human-readable description.
    pub message: String,
    /// Optional remediation hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

/// The outcome of validating one day's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff no violation has `Severity::Error`.
    pub is_valid: bool,
    /// Violations in deterministic order.
    pub violations: Vec<ValidationViolation>,
    /// Short human-readable synopsis derived from the violations.
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    /// Counts violations of a given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    /// Iterates violations of a given kind.
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &ValidationViolation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }
}
