//! Time-string and slot-grid utilities.
//!
//! Everything here is fail-soft: malformed wall-clock strings resolve to an
//! empty grid or a zero duration and log a warning, so one bad record never
//! aborts a whole schedule.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Assignment, MINUTES_PER_DAY, TimeInput, TimeSlot};

/// Generates the slot grid from `start` to `end` (both inclusive).
///
/// Returns an empty grid when either bound is malformed, when
/// `start >= end`, or when the interval is zero.
///
/// # Example
///
/// ```
/// use roster_engine::calculation::generate_slots;
///
/// let slots = generate_slots("09:00", "10:00", 30);
/// let labels: Vec<String> = slots.iter().map(|s| s.to_string()).collect();
/// assert_eq!(labels, vec!["09:00", "09:30", "10:00"]);
///
/// assert!(generate_slots("10:00", "09:00", 30).is_empty());
/// ```
pub fn generate_slots(start: &str, end: &str, interval_minutes: u32) -> Vec<TimeSlot> {
    match (TimeSlot::parse(start), TimeSlot::parse(end)) {
        (Some(start), Some(end)) => generate_grid(start, end, interval_minutes),
        _ => {
            warn!(start, end, "Unparsable slot grid bounds, generating no slots");
            Vec::new()
        }
    }
}

/// Typed form of [`generate_slots`].
pub fn generate_grid(start: TimeSlot, end: TimeSlot, interval_minutes: u32) -> Vec<TimeSlot> {
    if start >= end {
        warn!(%start, %end, "Slot grid start is not before end, generating no slots");
        return Vec::new();
    }
    if interval_minutes == 0 {
        warn!(%start, %end, "Slot grid interval is zero, generating no slots");
        return Vec::new();
    }

    (start.minutes()..=end.minutes())
        .step_by(interval_minutes as usize)
        .map(TimeSlot::from_minutes)
        .collect()
}

/// Minutes after midnight for an `HH:MM` string, or 0 when malformed.
pub fn to_minutes(value: &str) -> u32 {
    match TimeSlot::parse(value) {
        Some(slot) => slot.minutes(),
        None => {
            warn!(value, "Unparsable time string, treating as 00:00");
            0
        }
    }
}

/// Zero-padded `HH:MM` label for minutes after midnight, wrapping past 24:00.
pub fn from_minutes(minutes: u32) -> String {
    TimeSlot::from_minutes(minutes).to_string()
}

/// Absolute distance between two slots in minutes.
pub fn slot_difference(a: TimeSlot, b: TimeSlot) -> u32 {
    a.minutes().abs_diff(b.minutes())
}

/// Minutes from `start` to `end`.
///
/// When `end <= start` the shift is assumed to cross midnight and a day is
/// added before differencing. Malformed input yields 0.
///
/// # Example
///
/// ```
/// use roster_engine::calculation::duration_minutes;
///
/// assert_eq!(duration_minutes("09:00", "18:00"), 540);
/// assert_eq!(duration_minutes("23:30", "00:15"), 45);
/// assert_eq!(duration_minutes("late", "00:15"), 0);
/// ```
pub fn duration_minutes(start: &str, end: &str) -> u32 {
    let (Some(start_slot), Some(end_slot)) = (TimeSlot::parse(start), TimeSlot::parse(end)) else {
        warn!(start, end, "Unparsable duration bounds, treating as zero");
        return 0;
    };

    let start_minutes = start_slot.minutes();
    let mut end_minutes = end_slot.minutes();
    if end_minutes <= start_minutes {
        end_minutes += MINUTES_PER_DAY;
    }
    end_minutes - start_minutes
}

/// Minutes between two normalized time inputs.
///
/// Two instants are differenced directly (negative spans clamp to 0); any
/// other combination falls back to wall-clock [`duration_minutes`].
pub fn duration_between(start: &TimeInput, end: &TimeInput) -> u32 {
    match (start, end) {
        (TimeInput::Instant(start), TimeInput::Instant(end)) => {
            let minutes = (*end - *start).num_minutes();
            u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
        }
        _ => duration_minutes(&start.clock_label(), &end.clock_label()),
    }
}

/// An assignment that lost a slot collision during remapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedAssignment {
    /// The slot on the old grid.
    pub from: TimeSlot,
    /// The new-grid slot it mapped to, or `None` when the new grid is empty.
    pub target: Option<TimeSlot>,
    /// The value that was dropped.
    pub value: Assignment,
}

/// Result of moving assignments onto a grid with a different interval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapOutcome {
    /// Assignments keyed by new-grid slot.
    pub assignments: BTreeMap<TimeSlot, Assignment>,
    /// Assignments that could not be placed.
    pub dropped: Vec<DroppedAssignment>,
}

/// Moves assignments onto the grid `start..=end` at `new_interval`.
///
/// Each old slot maps to the nearest new slot, ties going to the earlier
/// one. When two old slots land on the same new slot the earlier one wins;
/// later values are reported in [`RemapOutcome::dropped`] and logged.
pub fn remap_assignments(
    old: &BTreeMap<TimeSlot, Assignment>,
    old_interval: u32,
    new_interval: u32,
    start: TimeSlot,
    end: TimeSlot,
) -> RemapOutcome {
    let grid = generate_grid(start, end, new_interval);
    debug!(
        old_interval,
        new_interval,
        assignments = old.len(),
        grid_slots = grid.len(),
        "Remapping assignments"
    );

    let mut outcome = RemapOutcome::default();
    for (&from, value) in old {
        let target = grid
            .iter()
            .copied()
            .min_by_key(|slot| slot_difference(*slot, from));

        match target {
            Some(target) if !outcome.assignments.contains_key(&target) => {
                outcome.assignments.insert(target, value.clone());
            }
            _ => {
                warn!(
                    %from,
                    target = ?target.map(|t| t.to_string()),
                    value = %value,
                    "Dropping assignment that collides after remapping"
                );
                outcome.dropped.push(DroppedAssignment {
                    from,
                    target,
                    value: value.clone(),
                });
            }
        }
    }
    outcome
}
