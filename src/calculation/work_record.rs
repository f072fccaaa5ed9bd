//! Work-record aggregation.
//!
//! Turns a day's slot assignments, or raw check-in/out data when no grid
//! exists, into the normalized [`WorkRecord`] the payroll and settlement
//! calculators consume.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{
    Assignment, CheckInOut, MINUTES_PER_DAY, StaffSchedule, TimeInput, TimeSlot, WorkRecord,
    WorkStatus,
};

use super::time_utils::duration_between;

/// Aggregates one staff member's slot assignments for `date` into a work
/// record.
///
/// The first non-idle slot becomes the scheduled start and the end of the
/// last non-idle slot (its start plus `interval_minutes`) the scheduled end,
/// so a contiguous day spans exactly its worked and break minutes. Each break
/// slot adds `interval_minutes` to the
/// break total and each station slot adds it to the worked total. A schedule
/// with nothing assigned keeps its day start time as the scheduled start.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use chrono::NaiveDate;
/// use roster_engine::calculation::{aggregate, generate_slots};
/// use roster_engine::models::{Assignment, StaffSchedule};
///
/// let slots = generate_slots("09:00", "10:30", 30);
/// let schedule = StaffSchedule {
///     id: "s1".to_string(),
///     display_name: "Kim".to_string(),
///     day_start_time: "09:00".parse().unwrap(),
///     assignments: BTreeMap::from([
///         ("09:00".parse().unwrap(), Assignment::Idle),
///         ("09:30".parse().unwrap(), Assignment::Station("T1".to_string())),
///         ("10:00".parse().unwrap(), Assignment::Break),
///         ("10:30".parse().unwrap(), Assignment::Station("T1".to_string())),
///     ]),
/// };
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let record = aggregate(&schedule, date, &slots, 30);
/// assert_eq!(record.worked_minutes, 60);
/// assert_eq!(record.break_minutes, 30);
/// ```
pub fn aggregate(
    schedule: &StaffSchedule,
    date: NaiveDate,
    slots: &[TimeSlot],
    interval_minutes: u32,
) -> WorkRecord {
    let mut first: Option<TimeSlot> = None;
    let mut last: Option<TimeSlot> = None;
    let mut worked_minutes: u32 = 0;
    let mut break_minutes: u32 = 0;
    let mut stations_touched = BTreeSet::new();

    for &slot in slots {
        let Some(assignment) = schedule.assignment_at(slot) else {
            continue;
        };
        match assignment {
            Assignment::Idle => continue,
            Assignment::Break => break_minutes = break_minutes.saturating_add(interval_minutes),
            Assignment::Station(station) => {
                worked_minutes = worked_minutes.saturating_add(interval_minutes);
                stations_touched.insert(station.clone());
            }
        }
        first.get_or_insert(slot);
        last = Some(slot);
    }

    let start = first.unwrap_or(schedule.day_start_time);

    debug!(
        staff_id = %schedule.id,
        %date,
        worked_minutes,
        break_minutes,
        stations = stations_touched.len(),
        "Aggregated schedule into work record"
    );

    WorkRecord {
        id: record_id(&schedule.id, date),
        staff_id: schedule.id.clone(),
        date,
        scheduled_start: Some(TimeInput::Clock(start.to_string())),
        scheduled_end: last.map(|slot| {
            let end = slot.minutes() + interval_minutes % MINUTES_PER_DAY;
            TimeInput::Clock(TimeSlot::from_minutes(end).to_string())
        }),
        actual_start: None,
        actual_end: None,
        worked_minutes,
        break_minutes,
        stations_touched,
        status: WorkStatus::Scheduled,
    }
}

/// Builds a work record directly from check-in/out data.
///
/// Worked minutes are the span between the effective start and end (actual
/// times, falling back to scheduled ones) less break minutes. Status is
/// completed when both check-in and check-out exist, in progress with only a
/// check-in, and scheduled otherwise.
pub fn aggregate_from_check_in_out(record: &CheckInOut) -> WorkRecord {
    let start = record.check_in.as_ref().or(record.scheduled_start.as_ref());
    let end = record.check_out.as_ref().or(record.scheduled_end.as_ref());

    let span = match (start, end) {
        (Some(start), Some(end)) => duration_between(start, end),
        _ => 0,
    };
    let worked_minutes = span.saturating_sub(record.break_minutes);

    let status = match (&record.check_in, &record.check_out) {
        (Some(_), Some(_)) => WorkStatus::Completed,
        (Some(_), None) => WorkStatus::InProgress,
        _ => WorkStatus::Scheduled,
    };

    WorkRecord {
        id: record.id.clone(),
        staff_id: record.staff_id.clone(),
        date: record.date,
        scheduled_start: record.scheduled_start.clone(),
        scheduled_end: record.scheduled_end.clone(),
        actual_start: record.check_in.clone(),
        actual_end: record.check_out.clone(),
        worked_minutes,
        break_minutes: record.break_minutes,
        stations_touched: record.station.iter().cloned().collect(),
        status,
    }
}

fn record_id(staff_id: &str, date: NaiveDate) -> String {
    format!("{}_{}", staff_id, date.format("%Y-%m-%d"))
}
