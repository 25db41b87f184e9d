//! Pure checks on clock times and slot ranges. None of these fail for
//! ordinary invalid input; they answer with a `bool` instead.

use std::iter::FusedIterator;

use uuid::Uuid;

pub use crate::models::time_slot::parse_time;
use crate::models::{
    schedule::ScheduleSlot,
    time_slot::{ClockTime, LAST_MINUTE, TimeRange},
};

/// Half-open overlap test; symmetric in its arguments.
pub fn ranges_overlap(a: &TimeRange, b: &TimeRange) -> bool {
    a.overlaps(b)
}

/// Whether `candidate_start` falls inside `[start, end)` of any slot in
/// `existing` other than `exclude_slot_id`. `existing` should hold the slots
/// of a single weekday.
pub fn is_slot_taken(
    candidate_start: ClockTime,
    exclude_slot_id: Option<Uuid>,
    existing: &[ScheduleSlot],
) -> bool {
    existing
        .iter()
        .filter(|slot| Some(slot.id) != exclude_slot_id)
        .any(|slot| slot.start_time <= candidate_start && candidate_start < slot.end_time)
}

/// End times strictly after `start` in steps of `granularity_minutes`, closing
/// with 23:59 when the last step would cross the day boundary.
///
/// The iterator is `Clone`, so a caller can restart it from a copy taken
/// before consumption. A zero granularity yields nothing.
pub fn valid_end_time_options(start: ClockTime, granularity_minutes: u16) -> EndTimeOptions {
    let next = if granularity_minutes == 0 || start.minutes() >= LAST_MINUTE {
        None
    } else {
        Some(start.minutes().saturating_add(granularity_minutes))
    };

    EndTimeOptions {
        next,
        step: granularity_minutes,
    }
}

#[derive(Debug, Clone)]
pub struct EndTimeOptions {
    next: Option<u16>,
    step: u16,
}

impl Iterator for EndTimeOptions {
    type Item = ClockTime;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if current >= LAST_MINUTE {
            self.next = None;
            return Some(ClockTime::END_OF_DAY);
        }
        self.next = Some(current.saturating_add(self.step));
        Some(ClockTime(current))
    }
}

impl FusedIterator for EndTimeOptions {}
