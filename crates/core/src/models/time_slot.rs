use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ScheduleError, ScheduleResult};

/// Last representable minute of a day (23:59). Slots never cross midnight.
pub const LAST_MINUTE: u16 = 23 * 60 + 59;

/// Wall-clock time of day with minute precision, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(pub(crate) u16);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    pub const END_OF_DAY: ClockTime = ClockTime(LAST_MINUTE);

    pub fn from_minutes(minutes: u16) -> ScheduleResult<Self> {
        if minutes > LAST_MINUTE {
            return Err(ScheduleError::InvalidFormat(format!(
                "{} minutes past midnight is beyond 23:59",
                minutes
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Adds minutes, returning `None` past 23:59.
    pub fn checked_add_minutes(self, minutes: u16) -> Option<Self> {
        self.0
            .checked_add(minutes)
            .filter(|m| *m <= LAST_MINUTE)
            .map(Self)
    }

    /// Parses the wire shape used by SQL `time` columns as well as `HH:MM`.
    /// A seconds part is only accepted when it is `00`.
    pub fn parse_wire(value: &str) -> ScheduleResult<Self> {
        match value.len() {
            8 if value.is_ascii() && value.ends_with(":00") => value[..5].parse(),
            _ => value.parse(),
        }
    }
}

/// Parses `HH:MM` (00:00 to 23:59) into minutes since midnight.
pub fn parse_time(hhmm: &str) -> ScheduleResult<u16> {
    let invalid = || ScheduleError::InvalidFormat(format!("expected HH:MM, got {:?}", hhmm));

    let bytes = hhmm.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(invalid());
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let hours = u16::from(bytes[0] - b'0') * 10 + u16::from(bytes[1] - b'0');
    let minutes = u16::from(bytes[3] - b'0') * 10 + u16::from(bytes[4] - b'0');
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s).map(Self)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ClockTime::parse_wire(&raw).map_err(serde::de::Error::custom)
    }
}

/// Half-open `[start, end)` range within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeRange {
    pub fn new(start: ClockTime, end: ClockTime) -> ScheduleResult<Self> {
        if end <= start {
            return Err(ScheduleError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, time: ClockTime) -> bool {
        self.start <= time && time < self.end
    }

    pub fn minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
