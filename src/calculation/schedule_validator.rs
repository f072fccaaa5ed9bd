//! Shift-schedule validation.
//!
//! Checks one day's station assignments against the workforce rules in a
//! [`RuleConfig`]: station double-booking, excessive continuous work,
//! insufficient rest and unexplained gaps. Validation is a pure function of
//! its inputs and is recomputed from scratch on every schedule change.

use tracing::debug;

use crate::models::{
    Assignment, RuleConfig, Severity, StaffSchedule, TimeSlot, ValidationResult,
    ValidationViolation, ViolationKind,
};

use super::time_utils::slot_difference;

/// Unassigned stretches longer than this, after a staff member has started
/// for the day, are reported.
pub const SCHEDULE_GAP_THRESHOLD_MINUTES: u32 = 120;

/// Validates a day's schedules against the rule configuration.
///
/// Sub-check results are concatenated in a fixed order (station conflicts,
/// continuous work, rest, gaps); within each check violations are ordered by
/// slot, then by the position of the staff member in `schedules`. An empty
/// slot list or staff list yields a valid, empty result.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use roster_engine::calculation::{generate_slots, validate};
/// use roster_engine::models::{Assignment, RuleConfig, StaffSchedule};
///
/// let slots = generate_slots("09:00", "10:00", 30);
/// let staff = |id: &str| StaffSchedule {
///     id: id.to_string(),
///     display_name: id.to_string(),
///     day_start_time: "09:00".parse().unwrap(),
///     assignments: BTreeMap::from([
///         ("09:00".parse().unwrap(), Assignment::Station("T1".to_string())),
///     ]),
/// };
///
/// let result = validate(&[staff("a"), staff("b")], &slots, &RuleConfig::default());
/// assert!(!result.is_valid);
/// assert_eq!(result.violations.len(), 2);
/// ```
pub fn validate(
    schedules: &[StaffSchedule],
    slots: &[TimeSlot],
    config: &RuleConfig,
) -> ValidationResult {
    let mut ordered_slots = slots.to_vec();
    ordered_slots.sort();
    ordered_slots.dedup();

    let mut violations = Vec::new();
    if !ordered_slots.is_empty() && !schedules.is_empty() {
        if !config.allow_station_conflicts {
            violations.extend(check_station_conflicts(schedules, &ordered_slots, config));
        }
        violations.extend(check_continuous_work(schedules, &ordered_slots, config));
        violations.extend(check_rest_time(schedules, &ordered_slots, config));
        violations.extend(check_schedule_gaps(schedules, &ordered_slots));
    }

    let result = build_result(violations);
    debug!(
        staff = schedules.len(),
        slots = ordered_slots.len(),
        violations = result.violations.len(),
        is_valid = result.is_valid,
        "Schedule validated"
    );
    result
}

/// Reports every occupant of a station holding more staff than allowed in
/// one slot.
pub fn check_station_conflicts(
    schedules: &[StaffSchedule],
    slots: &[TimeSlot],
    config: &RuleConfig,
) -> Vec<ValidationViolation> {
    let mut violations = Vec::new();

    for &slot in slots {
        let stations: Vec<Option<&str>> = schedules
            .iter()
            .map(|s| s.assignment_at(slot).and_then(Assignment::station))
            .collect();

        for (schedule, station) in schedules.iter().zip(&stations) {
            let Some(station) = station else {
                continue;
            };
            let occupants = stations.iter().filter(|s| s.as_ref() == Some(station)).count();
            if occupants as u32 <= config.max_concurrent_per_station {
                continue;
            }
            violations.push(ValidationViolation {
                kind: ViolationKind::StationConflict,
                severity: Severity::Error,
                staff_id: schedule.id.clone(),
                slot,
                message: format!(
                    "{} shares station {} with {} other staff at {} ({} assigned)",
                    schedule.display_name,
                    station,
                    occupants - 1,
                    slot,
                    occupants
                ),
                suggested_fix: Some(format!(
                    "Reassign {} to a free station at {}",
                    schedule.display_name, slot
                )),
            });
        }
    }

    violations
}

/// Reports active runs longer than `max_continuous_minutes`.
///
/// A run's length is the sum of the gaps between its consecutive active
/// slots. The warning spans the run's first slot to the slot that ended it
/// (or its last active slot when the run reaches the end of the day).
pub fn check_continuous_work(
    schedules: &[StaffSchedule],
    slots: &[TimeSlot],
    config: &RuleConfig,
) -> Vec<ValidationViolation> {
    let mut found = Vec::new();

    for (index, schedule) in schedules.iter().enumerate() {
        // (run start, last active slot, accumulated minutes)
        let mut run: Option<(TimeSlot, TimeSlot, u32)> = None;

        for &slot in slots {
            if is_active(schedule, slot) {
                run = Some(match run {
                    Some((start, last, minutes)) => {
                        (start, slot, minutes + slot_difference(last, slot))
                    }
                    None => (slot, slot, 0),
                });
            } else if let Some((start, _, minutes)) = run.take() {
                if minutes > config.max_continuous_minutes {
                    found.push((index, continuous_work_violation(schedule, start, slot, minutes, config)));
                }
            }
        }

        if let Some((start, last, minutes)) = run {
            if minutes > config.max_continuous_minutes {
                found.push((index, continuous_work_violation(schedule, start, last, minutes, config)));
            }
        }
    }

    in_slot_order(found)
}

fn continuous_work_violation(
    schedule: &StaffSchedule,
    start: TimeSlot,
    end: TimeSlot,
    minutes: u32,
    config: &RuleConfig,
) -> ValidationViolation {
    ValidationViolation {
        kind: ViolationKind::ContinuousWork,
        severity: Severity::Warning,
        staff_id: schedule.id.clone(),
        slot: start,
        message: format!(
            "{} works {} minutes continuously from {} to {} (limit {} minutes)",
            schedule.display_name, minutes, start, end, config.max_continuous_minutes
        ),
        suggested_fix: Some(format!(
            "Insert a break within {} minutes of {}",
            config.max_continuous_minutes, start
        )),
    }
}

/// Reports active slots that follow the previous active slot after a rest
/// shorter than `min_rest_minutes`.
///
/// Rest is the time covered by the non-active slots between the two, so
/// back-to-back active slots have no rest and are not reported.
pub fn check_rest_time(
    schedules: &[StaffSchedule],
    slots: &[TimeSlot],
    config: &RuleConfig,
) -> Vec<ValidationViolation> {
    let mut found = Vec::new();

    for (index, schedule) in schedules.iter().enumerate() {
        let mut last_active: Option<usize> = None;

        for (position, &slot) in slots.iter().enumerate() {
            if !is_active(schedule, slot) {
                continue;
            }
            if let Some(previous) = last_active {
                let rest = slot_difference(slots[previous + 1], slot);
                if rest > 0 && rest < config.min_rest_minutes {
                    found.push((
                        index,
                        ValidationViolation {
                            kind: ViolationKind::InsufficientRest,
                            severity: Severity::Warning,
                            staff_id: schedule.id.clone(),
                            slot,
                            message: format!(
                                "{} returns at {} after only {} minutes of rest (minimum {} minutes)",
                                schedule.display_name, slot, rest, config.min_rest_minutes
                            ),
                            suggested_fix: Some(format!(
                                "Extend the rest before {} to at least {} minutes",
                                slot, config.min_rest_minutes
                            )),
                        },
                    ));
                }
            }
            last_active = Some(position);
        }
    }

    in_slot_order(found)
}

/// Reports unassigned stretches longer than
/// [`SCHEDULE_GAP_THRESHOLD_MINUTES`] between two assignments.
///
/// Only stretches after the staff member's first assignment (active or
/// break) and closed by a later assignment count; trailing idle time at the
/// end of the day is the end of the shift.
pub fn check_schedule_gaps(
    schedules: &[StaffSchedule],
    slots: &[TimeSlot],
) -> Vec<ValidationViolation> {
    let mut found = Vec::new();

    for (index, schedule) in schedules.iter().enumerate() {
        let mut started = false;
        let mut gap_start: Option<TimeSlot> = None;

        for &slot in slots {
            let assigned = matches!(
                schedule.assignment_at(slot),
                Some(Assignment::Station(_) | Assignment::Break)
            );

            if !assigned {
                if started && gap_start.is_none() {
                    gap_start = Some(slot);
                }
                continue;
            }

            if let Some(start) = gap_start.take() {
                let minutes = slot_difference(start, slot);
                if minutes > SCHEDULE_GAP_THRESHOLD_MINUTES {
                    found.push((
                        index,
                        ValidationViolation {
                            kind: ViolationKind::ScheduleGap,
                            severity: Severity::Info,
                            staff_id: schedule.id.clone(),
                            slot: start,
                            message: format!(
                                "{} has {} unassigned minutes from {} to {}",
                                schedule.display_name, minutes, start, slot
                            ),
                            suggested_fix: None,
                        },
                    ));
                }
            }
            started = true;
        }
    }

    in_slot_order(found)
}

fn is_active(schedule: &StaffSchedule, slot: TimeSlot) -> bool {
    schedule.assignment_at(slot).is_some_and(Assignment::is_active)
}

fn in_slot_order(mut found: Vec<(usize, ValidationViolation)>) -> Vec<ValidationViolation> {
    found.sort_by_key(|(index, violation)| (violation.slot, *index));
    found.into_iter().map(|(_, violation)| violation).collect()
}

fn build_result(violations: Vec<ValidationViolation>) -> ValidationResult {
    let count = |severity: Severity| violations.iter().filter(|v| v.severity == severity).count();
    let errors = count(Severity::Error);
    let warnings = count(Severity::Warning);
    let notices = count(Severity::Info);

    let mut suggestions = Vec::new();
    if errors > 0 {
        suggestions.push(format!("{errors} error(s) must be resolved before publishing"));
    }
    if warnings > 0 {
        suggestions.push(format!("{warnings} warning(s) should be reviewed"));
    }
    if notices > 0 {
        suggestions.push(format!("{notices} notice(s) for information"));
    }
    if violations
        .iter()
        .any(|v| v.kind == ViolationKind::StationConflict)
    {
        suggestions.push(
            "Reassign double-booked staff so each station is covered once per slot".to_string(),
        );
    }

    ValidationResult {
        is_valid: errors == 0,
        violations,
        suggestions,
    }
}
