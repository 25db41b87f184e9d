use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{ScheduleError, ScheduleResult},
    models::time_slot::{ClockTime, TimeRange},
};

/// Day of week as exchanged with the backend: 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub fn new(day: u8) -> ScheduleResult<Self> {
        if day > 6 {
            return Err(ScheduleError::InvalidDay(day));
        }
        Ok(Self(day))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn weekday(self) -> Weekday {
        match self.0 {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            _ => Weekday::Sat,
        }
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = ScheduleError;

    fn try_from(day: u8) -> Result<Self, Self::Error> {
        Self::new(day)
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> Self {
        day.0
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        // num_days_from_sunday is always within 0..=6
        Self(weekday.num_days_from_sunday() as u8)
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.weekday())
    }
}

/// One recurring availability range on a weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl ScheduleSlot {
    pub fn new(day_of_week: DayOfWeek, range: TimeRange) -> Self {
        Self {
            id: Uuid::new_v4(),
            day_of_week,
            start_time: range.start,
            end_time: range.end,
        }
    }

    /// Validated `[start_time, end_time)` of this slot.
    pub fn range(&self) -> ScheduleResult<TimeRange> {
        TimeRange::new(self.start_time, self.end_time)
    }
}

/// Editable bound of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotField {
    StartTime,
    EndTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSlotRequest {
    /// RFC 3339 timestamp with offset, or a bare `YYYY-MM-DD` date. Absent
    /// means today in `tz`.
    #[serde(default)]
    pub date: Option<String>,
    /// IANA zone used when `date` carries no offset of its own.
    pub tz: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSlotResponse {
    pub slot: ScheduleSlot,
    pub schedule: ScheduleDraftResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    pub field: SlotField,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day_of_week: DayOfWeek,
    pub slots: Vec<ScheduleSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDraftResponse {
    pub pro_id: Uuid,
    /// True while local edits have not been saved.
    pub dirty: bool,
    /// True while a save is in flight.
    pub saving: bool,
    pub days: Vec<DaySchedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotTakenResponse {
    pub taken: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndTimeOptionsResponse {
    pub start: ClockTime,
    pub granularity: u16,
    pub options: Vec<ClockTime>,
}
