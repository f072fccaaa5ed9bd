//! Schedule models: assignments, per-staff schedules, the day grid and the
//! workforce rules a schedule is validated against.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calculation::generate_grid;
use crate::error::EngineError;

use super::TimeSlot;

/// What a staff member is doing in one slot.
///
/// Serialized as `"idle"`, `"break"` or `"station:<id>"`.
///
/// # Example
///
/// ```
/// use roster_engine::models::Assignment;
///
/// let assignment: Assignment = "station:T3".parse().unwrap();
/// assert_eq!(assignment, Assignment::Station("T3".to_string()));
/// assert!(assignment.is_active());
/// assert!(!Assignment::Break.is_active());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Assignment {
    /// Not working.
    Idle,
    /// On a break.
    Break,
    /// Actively assigned to a station (e.g. a table).
    Station(String),
}

const STATION_PREFIX: &str = "station:";

impl Assignment {
    /// Returns true for station assignments.
    pub fn is_active(&self) -> bool {
        matches!(self, Assignment::Station(_))
    }

    /// Returns the station id for station assignments.
    pub fn station(&self) -> Option<&str> {
        match self {
            Assignment::Station(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignment::Idle => f.write_str("idle"),
            Assignment::Break => f.write_str("break"),
            Assignment::Station(id) => write!(f, "{STATION_PREFIX}{id}"),
        }
    }
}

impl FromStr for Assignment {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "idle" => Ok(Assignment::Idle),
            "break" => Ok(Assignment::Break),
            other => match other.strip_prefix(STATION_PREFIX).map(str::trim) {
                Some(id) if !id.is_empty() => Ok(Assignment::Station(id.to_string())),
                _ => Err(EngineError::InvalidAssignment {
                    value: s.to_string(),
                }),
            },
        }
    }
}

impl TryFrom<String> for Assignment {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Assignment> for String {
    fn from(assignment: Assignment) -> Self {
        assignment.to_string()
    }
}

/// One staff member's assignments for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSchedule {
    /// Unique identifier for the staff member.
    pub id: String,
    /// Name shown in violation messages.
    pub display_name: String,
    /// The staff member's individual start time for the day.
    pub day_start_time: TimeSlot,
    /// Assignment per slot. Slots without an entry are unassigned.
    #[serde(default)]
    pub assignments: BTreeMap<TimeSlot, Assignment>,
}

impl StaffSchedule {
    /// Returns the assignment for a slot, if any.
    pub fn assignment_at(&self, slot: TimeSlot) -> Option<&Assignment> {
        self.assignments.get(&slot)
    }

    /// Returns every assignment key that is not on the supplied grid.
    pub fn off_grid_slots(&self, slots: &[TimeSlot]) -> Vec<TimeSlot> {
        self.assignments
            .keys()
            .filter(|slot| slots.binary_search(slot).is_err())
            .copied()
            .collect()
    }

    /// Rejects a schedule holding assignments off the supplied grid.
    pub fn ensure_on_grid(&self, slots: &[TimeSlot]) -> Result<(), EngineError> {
        let off_grid = self.off_grid_slots(slots);
        if off_grid.is_empty() {
            return Ok(());
        }
        let labels: Vec<String> = off_grid.iter().map(ToString::to_string).collect();
        Err(EngineError::InvalidSchedule {
            staff_id: self.id.clone(),
            message: format!("slots not on the grid: {}", labels.join(", ")),
        })
    }
}

/// The slot grid for a day: start, end (both inclusive) and interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleGrid {
    /// First slot of the day.
    pub start_time: TimeSlot,
    /// Last slot of the day.
    pub end_time: TimeSlot,
    /// Width of each slot in minutes.
    pub interval_minutes: u32,
}

impl ScheduleGrid {
    /// Generates the ordered slots for this grid.
    pub fn slots(&self) -> Vec<TimeSlot> {
        generate_grid(self.start_time, self.end_time, self.interval_minutes)
    }
}

/// Workforce rules a day's schedule is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Longest continuous active run allowed before a warning.
    pub max_continuous_minutes: u32,
    /// Shortest rest allowed between two active slots.
    pub min_rest_minutes: u32,
    /// Skips station conflict checks entirely when true.
    #[serde(default)]
    pub allow_station_conflicts: bool,
    /// Occupants a station may hold in one slot before it is a conflict.
    #[serde(default = "default_max_concurrent_per_station")]
    pub max_concurrent_per_station: u32,
}

fn default_max_concurrent_per_station() -> u32 {
    1
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_continuous_minutes: 240,
            min_rest_minutes: 30,
            allow_station_conflicts: false,
            max_concurrent_per_station: default_max_concurrent_per_station(),
        }
    }
}
