//! Wall-clock time slot model.
//!
//! A [`TimeSlot`] is a minute-of-day position on a schedule grid. It is
//! written and read as a zero-padded `HH:MM` string, and orders
//! chronologically within one day.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Number of minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A slot label on a day's schedule grid, identified by its start time.
///
/// # Example
///
/// ```
/// use roster_engine::models::TimeSlot;
///
/// let slot: TimeSlot = "09:30".parse().unwrap();
/// assert_eq!(slot.minutes(), 570);
/// assert_eq!(slot.to_string(), "09:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    minutes: u16,
}

impl TimeSlot {
    /// Builds a slot from minutes after midnight, wrapping past 24:00.
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            minutes: (minutes % MINUTES_PER_DAY) as u16,
        }
    }

    /// Minutes after midnight.
    pub fn minutes(&self) -> u32 {
        u32::from(self.minutes)
    }

    /// Parses an `H:MM` or `HH:MM` string, returning `None` when malformed.
    pub fn parse(value: &str) -> Option<Self> {
        let (hours, minutes) = value.trim().split_once(':')?;
        if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
            return None;
        }
        if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hours: u32 = hours.parse().ok()?;
        let minutes: u32 = minutes.parse().ok()?;
        if hours > 23 || minutes > 59 {
            return None;
        }
        Some(Self::from_minutes(hours * 60 + minutes))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

impl FromStr for TimeSlot {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| EngineError::InvalidTime {
            value: s.to_string(),
        })
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zero_padded() {
        let slot = TimeSlot::parse("09:05").unwrap();
        assert_eq!(slot.minutes(), 545);
    }

    #[test]
    fn test_parse_single_digit_hour() {
        assert_eq!(TimeSlot::parse("9:30"), TimeSlot::parse("09:30"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "9", "24:00", "12:60", "ab:cd", "12:5", "123:00", "-1:00", "12:00:00"] {
            assert!(TimeSlot::parse(bad).is_none(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(TimeSlot::from_minutes(0).to_string(), "00:00");
        assert_eq!(TimeSlot::from_minutes(23 * 60 + 59).to_string(), "23:59");
    }

    #[test]
    fn test_from_minutes_wraps_past_midnight() {
        assert_eq!(TimeSlot::from_minutes(MINUTES_PER_DAY + 15).to_string(), "00:15");
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut slots: Vec<TimeSlot> = ["13:00", "09:30", "09:00", "23:45"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        slots.sort();
        let labels: Vec<String> = slots.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["09:00", "09:30", "13:00", "23:45"]);
    }

    #[test]
    fn test_from_str_error() {
        let err = "7pm".parse::<TimeSlot>().unwrap_err();
        assert!(matches!(err, EngineError::InvalidTime { value } if value == "7pm"));
    }

    #[test]
    fn test_serde_as_string() {
        let slot = TimeSlot::parse("18:30").unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "\"18:30\"");
        let back: TimeSlot = serde_json::from_str("\"18:30\"").unwrap();
        assert_eq!(back, slot);
        assert!(serde_json::from_str::<TimeSlot>("\"18:3\"").is_err());
    }
}
