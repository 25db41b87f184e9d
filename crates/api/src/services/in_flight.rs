use std::{
    collections::HashSet,
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use chrono::NaiveDate;
use slotwise_core::{
    errors::{ScheduleError, ScheduleResult},
    scheduling::blocks::local_date_key,
};
use tracing::warn;
use uuid::Uuid;

/// Entity that accepts at most one mutating action at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Appointment(Uuid),
    Block { pro_id: Uuid, date: NaiveDate },
    ScheduleSave(Uuid),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Appointment(id) => write!(f, "appointment {}", id),
            EntityKey::Block { pro_id, date } => {
                write!(f, "block {} for {}", local_date_key(date), pro_id)
            }
            EntityKey::ScheduleSave(pro_id) => write!(f, "schedule save for {}", pro_id),
        }
    }
}

/// Set of entities with an action in flight.
///
/// Acquiring returns a guard that frees the entity when dropped, including
/// when the request future is cancelled half way.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<EntityKey>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails with `Busy` while another action holds `key`.
    pub fn try_acquire(&self, key: EntityKey) -> ScheduleResult<InFlightGuard> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(key.clone()) {
            warn!("Rejected concurrent action on {}", key);
            return Err(ScheduleError::Busy(key.to_string()));
        }

        Ok(InFlightGuard {
            active: Arc::clone(&self.active),
            key,
        })
    }

    pub fn is_active(&self, key: &EntityKey) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<EntityKey>>>,
    key: EntityKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
