//! Whole-day unavailability. Unlike the weekly schedule, block state only
//! reflects what the backend has confirmed: a toggle is decided here, executed
//! by the persistence layer, and applied locally once it succeeded.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::models::block::{BlockAction, DATE_FORMAT, DateBlock};

/// Calendar date of `date` taken from its own (local) fields, never from a
/// UTC conversion.
pub fn local_date<D: Datelike>(date: &D) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), date.day())
}

/// `YYYY-MM-DD` key for `date` built from local calendar fields.
pub fn local_date_key<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn is_blocked<D: Datelike>(date: &D, blocks: &[DateBlock]) -> bool {
    local_date(date).is_some_and(|day| blocks.iter().any(|block| block.date == day))
}

/// Action needed to move `date` from `currently_blocked` to `desired_blocked`;
/// `None` when nothing has to change.
pub fn toggle_block(
    date: NaiveDate,
    currently_blocked: bool,
    desired_blocked: bool,
) -> Option<BlockAction> {
    let action = match (currently_blocked, desired_blocked) {
        (false, true) => Some(BlockAction::Create),
        (true, false) => Some(BlockAction::Delete),
        _ => None,
    };
    debug!(
        "Block toggle for {}: blocked={} desired={} action={:?}",
        date.format(DATE_FORMAT),
        currently_blocked,
        desired_blocked,
        action
    );
    action
}

/// Server-confirmed blocked dates of one professional; one entry per date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateBlockRegistry {
    pro_id: Uuid,
    dates: BTreeSet<NaiveDate>,
}

impl DateBlockRegistry {
    pub fn new(pro_id: Uuid) -> Self {
        Self {
            pro_id,
            dates: BTreeSet::new(),
        }
    }

    /// Keeps only the blocks that belong to `pro_id`; duplicates collapse.
    pub fn from_blocks(pro_id: Uuid, blocks: &[DateBlock]) -> Self {
        let dates = blocks
            .iter()
            .filter(|block| block.pro_id == pro_id)
            .map(|block| block.date)
            .collect();
        Self { pro_id, dates }
    }

    pub fn pro_id(&self) -> Uuid {
        self.pro_id
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn is_blocked<D: Datelike>(&self, date: &D) -> bool {
        local_date(date).is_some_and(|day| self.contains(day))
    }

    pub fn plan(&self, date: NaiveDate, desired_blocked: bool) -> Option<BlockAction> {
        toggle_block(date, self.contains(date), desired_blocked)
    }

    /// Records an action the backend has accepted.
    pub fn apply_confirmed(&mut self, date: NaiveDate, action: BlockAction) {
        match action {
            BlockAction::Create => {
                self.dates.insert(date);
            }
            BlockAction::Delete => {
                self.dates.remove(&date);
            }
        }
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    pub fn to_blocks(&self) -> Vec<DateBlock> {
        self.dates
            .iter()
            .map(|date| DateBlock {
                id: None,
                pro_id: self.pro_id,
                date: *date,
            })
            .collect()
    }
}
