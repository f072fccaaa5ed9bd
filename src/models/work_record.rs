//! Normalized per-day work record and its upstream time inputs.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A start or end time as normalized by the data layer.
///
/// Absent times are represented by `Option::None` on the owning field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInput {
    /// A wall-clock `HH:MM` string, kept raw so bad data fails soft.
    Clock(String),
    /// An absolute instant.
    Instant(NaiveDateTime),
}

impl TimeInput {
    /// Convenience constructor for wall-clock values.
    pub fn clock(value: impl Into<String>) -> Self {
        TimeInput::Clock(value.into())
    }

    /// Wall-clock `HH:MM` form of this time.
    pub fn clock_label(&self) -> String {
        match self {
            TimeInput::Clock(value) => value.clone(),
            TimeInput::Instant(instant) => instant.format("%H:%M").to_string(),
        }
    }
}

/// Lifecycle state of a work record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    /// Planned but not started.
    Scheduled,
    /// Checked in, not yet checked out.
    InProgress,
    /// Checked in and out.
    Completed,
}

/// One staff member's normalized work for one day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkRecord {
    /// Unique identifier for the record.
    pub id: String,
    /// The staff member who worked.
    pub staff_id: String,
    /// The day worked.
    pub date: NaiveDate,
    /// Planned start.
    #[serde(default)]
    pub scheduled_start: Option<TimeInput>,
    /// Planned end.
    #[serde(default)]
    pub scheduled_end: Option<TimeInput>,
    /// Actual check-in.
    #[serde(default)]
    pub actual_start: Option<TimeInput>,
    /// Actual check-out.
    #[serde(default)]
    pub actual_end: Option<TimeInput>,
    /// Minutes spent working.
    pub worked_minutes: u32,
    /// Minutes spent on break.
    #[serde(default)]
    pub break_minutes: u32,
    /// Stations worked during the day.
    #[serde(default)]
    pub stations_touched: BTreeSet<String>,
    /// Lifecycle state.
    pub status: WorkStatus,
}

impl WorkRecord {
    /// Start used for settlement: actual if known, otherwise scheduled.
    pub fn effective_start(&self) -> Option<&TimeInput> {
        self.actual_start.as_ref().or(self.scheduled_start.as_ref())
    }

    /// End used for settlement: actual if known, otherwise scheduled.
    pub fn effective_end(&self) -> Option<&TimeInput> {
        self.actual_end.as_ref().or(self.scheduled_end.as_ref())
    }

    /// True when settlement would rely on at least one scheduled time.
    pub fn is_estimate(&self) -> bool {
        self.actual_start.is_none() || self.actual_end.is_none()
    }
}

/// Raw check-in/out data used when no schedule grid exists for the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInOut {
    /// Unique identifier for the source record.
    pub id: String,
    /// The staff member.
    pub staff_id: String,
    /// The day worked.
    pub date: NaiveDate,
    /// Planned start.
    #[serde(default)]
    pub scheduled_start: Option<TimeInput>,
    /// Planned end.
    #[serde(default)]
    pub scheduled_end: Option<TimeInput>,
    /// Check-in time.
    #[serde(default)]
    pub check_in: Option<TimeInput>,
    /// Check-out time.
    #[serde(default)]
    pub check_out: Option<TimeInput>,
    /// Break minutes recorded for the day.
    #[serde(default)]
    pub break_minutes: u32,
    /// Station worked, if known.
    #[serde(default)]
    pub station: Option<String>,
}
