//! Recurring weekly availability held as an explicit value.
//!
//! Every edit takes the current [`WeeklySchedule`] by reference and returns a
//! new one; the caller decides when the result is persisted. Slots keep their
//! insertion order internally and are sorted by start time on read.

use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::debug;
use uuid::Uuid;

use crate::{
    errors::{ScheduleError, ScheduleResult},
    models::{
        schedule::{DaySchedule, DayOfWeek, ScheduleSlot, SlotField},
        time_slot::{ClockTime, LAST_MINUTE, TimeRange},
    },
};

/// Bounds proposed for a slot added without explicit times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDefaults {
    pub preferred_start: ClockTime,
    pub length_minutes: u16,
    /// Shortest slot worth proposing; also the end-time picker step.
    pub granularity_minutes: u16,
}

impl Default for SlotDefaults {
    fn default() -> Self {
        Self {
            preferred_start: ClockTime(9 * 60),
            length_minutes: 60,
            granularity_minutes: 15,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: BTreeMap<DayOfWeek, Vec<ScheduleSlot>>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule from a server snapshot without validating it.
    pub fn from_slots(slots: impl IntoIterator<Item = ScheduleSlot>) -> Self {
        let mut days: BTreeMap<DayOfWeek, Vec<ScheduleSlot>> = BTreeMap::new();
        for slot in slots {
            days.entry(slot.day_of_week).or_default().push(slot);
        }
        Self { days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn find(&self, slot_id: Uuid) -> Option<&ScheduleSlot> {
        self.days.values().flatten().find(|slot| slot.id == slot_id)
    }

    /// Slots of one weekday ordered by start time.
    pub fn day(&self, day: DayOfWeek) -> Vec<&ScheduleSlot> {
        let mut slots: Vec<&ScheduleSlot> = self.days.get(&day).into_iter().flatten().collect();
        slots.sort_by_key(|slot| (slot.start_time, slot.end_time));
        slots
    }

    pub fn days(&self) -> Vec<DaySchedule> {
        self.days
            .keys()
            .map(|day| DaySchedule {
                day_of_week: *day,
                slots: self.day(*day).into_iter().cloned().collect(),
            })
            .collect()
    }

    /// Persistence payload derived from the current state, ordered by day then start.
    pub fn slots(&self) -> Vec<ScheduleSlot> {
        self.days().into_iter().flat_map(|day| day.slots).collect()
    }

    /// Checks every slot has `start < end` and no two slots of a day overlap.
    pub fn validate(&self) -> ScheduleResult<()> {
        for (day, slots) in &self.days {
            let mut ranges = slots
                .iter()
                .map(ScheduleSlot::range)
                .collect::<ScheduleResult<Vec<_>>>()?;
            ranges.sort_by_key(|range| range.start);

            for pair in ranges.windows(2) {
                if pair[0].overlaps(&pair[1]) {
                    return Err(overlap(*day, &pair[1]));
                }
            }
        }
        Ok(())
    }

    /// Appends a slot on the weekday of `date`, read from its own local
    /// calendar fields. A `DateTime` in the user's zone therefore never shifts
    /// to the neighbouring UTC day.
    pub fn add_slot_local<D: Datelike>(
        &self,
        date: &D,
        defaults: &SlotDefaults,
    ) -> ScheduleResult<(WeeklySchedule, ScheduleSlot)> {
        self.add_slot_on(DayOfWeek::from(date.weekday()), defaults)
    }

    /// Appends a slot on `day` at the first free gap at or after the preferred
    /// start, wrapping to the beginning of the day when nothing later is free.
    pub fn add_slot_on(
        &self,
        day: DayOfWeek,
        defaults: &SlotDefaults,
    ) -> ScheduleResult<(WeeklySchedule, ScheduleSlot)> {
        let taken: Vec<TimeRange> = self
            .day(day)
            .into_iter()
            .filter_map(|slot| slot.range().ok())
            .collect();
        let gaps = free_gaps(&taken);

        let min_len = defaults.granularity_minutes.max(1);
        let length = defaults.length_minutes.max(min_len);
        let preferred = defaults.preferred_start.minutes();

        let later = gaps.iter().find_map(|&(gap_start, gap_end)| {
            let start = gap_start.max(preferred);
            (gap_end > start && gap_end - start >= min_len).then_some((start, gap_end))
        });
        let earlier = || {
            gaps.iter()
                .find(|&&(gap_start, gap_end)| gap_end - gap_start >= min_len)
                .copied()
        };

        let (start, gap_end) = later
            .or_else(earlier)
            .ok_or(ScheduleError::NoAvailableSlot(day.index()))?;
        let end = start.saturating_add(length).min(gap_end);

        let range = TimeRange::new(ClockTime(start), ClockTime(end))?;
        let slot = ScheduleSlot::new(day, range);
        debug!("Adding local slot {} on {}: {}", slot.id, day, range);

        let mut next = self.clone();
        next.days.entry(day).or_default().push(slot.clone());
        Ok((next, slot))
    }

    /// Moves one bound of a slot, rejecting ranges that become empty or overlap
    /// a sibling on the same weekday.
    pub fn update_slot(
        &self,
        slot_id: Uuid,
        field: SlotField,
        value: ClockTime,
    ) -> ScheduleResult<WeeklySchedule> {
        let current = self
            .find(slot_id)
            .ok_or_else(|| ScheduleError::NotFound(format!("Slot with ID {} not found", slot_id)))?;

        let mut updated = current.clone();
        match field {
            SlotField::StartTime => updated.start_time = value,
            SlotField::EndTime => updated.end_time = value,
        }
        let range = updated.range()?;

        let day = updated.day_of_week;
        let collides = self
            .day(day)
            .into_iter()
            .filter(|slot| slot.id != slot_id)
            .filter_map(|slot| slot.range().ok())
            .any(|sibling| sibling.overlaps(&range));
        if collides {
            return Err(overlap(day, &range));
        }

        let mut next = self.clone();
        if let Some(slot) = next
            .days
            .get_mut(&day)
            .and_then(|slots| slots.iter_mut().find(|slot| slot.id == slot_id))
        {
            *slot = updated;
        }
        Ok(next)
    }

    /// Removes the slot if present; unknown ids leave the schedule unchanged.
    pub fn remove_slot(&self, slot_id: Uuid) -> WeeklySchedule {
        let mut next = self.clone();
        for slots in next.days.values_mut() {
            slots.retain(|slot| slot.id != slot_id);
        }
        next.days.retain(|_, slots| !slots.is_empty());
        next
    }
}

fn overlap(day: DayOfWeek, range: &TimeRange) -> ScheduleError {
    ScheduleError::Overlap {
        day: day.index(),
        start: range.start.to_string(),
        end: range.end.to_string(),
    }
}

/// Free `[start, end)` minute ranges of a day, given ranges sorted by start.
fn free_gaps(taken: &[TimeRange]) -> Vec<(u16, u16)> {
    let mut gaps = Vec::new();
    let mut cursor = 0;
    for range in taken {
        let start = range.start.minutes();
        if start > cursor {
            gaps.push((cursor, start));
        }
        cursor = cursor.max(range.end.minutes());
    }
    if cursor < LAST_MINUTE {
        gaps.push((cursor, LAST_MINUTE));
    }
    gaps
}
