use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Duration, Utc};
use slotwise_backend::{Backend, models::AppointmentQuery};
use slotwise_core::{
    errors::{ScheduleError, ScheduleResult},
    models::appointment::{Appointment, AppointmentStatus, TransitionResponse},
    scheduling::lifecycle::{self, AppointmentAction},
};
use tracing::{debug, info};
use uuid::Uuid;

use super::in_flight::{EntityKey, InFlight};

#[derive(Debug, Clone)]
struct Snapshot {
    appointments: Vec<Appointment>,
    since: Option<DateTime<Utc>>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.fetched_at) < ttl
    }

    fn status_of(&self, id: Uuid) -> Option<AppointmentStatus> {
        self.appointments
            .iter()
            .find(|appointment| appointment.id == id)
            .map(|appointment| appointment.status)
    }
}

#[derive(Debug, Default)]
struct Entry {
    /// Bumped by every invalidation; a fetch only lands if it is unchanged.
    generation: u64,
    snapshot: Option<Snapshot>,
}

/// Latest appointment list per professional.
///
/// Reads are served from the snapshot while it is younger than the TTL;
/// every successful status change drops the professional's snapshot.
#[derive(Debug)]
pub struct AppointmentBook {
    ttl: Duration,
    entries: Mutex<HashMap<Uuid, Entry>>,
}

impl AppointmentBook {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fresh_snapshot<T>(
        &self,
        pro_id: Uuid,
        f: impl FnOnce(&Snapshot) -> Option<T>,
    ) -> Option<T> {
        self.lock()
            .get(&pro_id)
            .and_then(|entry| entry.snapshot.as_ref())
            .filter(|snapshot| snapshot.is_fresh(Utc::now(), self.ttl))
            .and_then(f)
    }

    /// Appointments of `pro_id` starting at or after `since`.
    pub async fn list(
        &self,
        backend: &dyn Backend,
        pro_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> ScheduleResult<Vec<Appointment>> {
        let cached = self.fresh_snapshot(pro_id, |snapshot| {
            (snapshot.since == since).then(|| snapshot.appointments.clone())
        });
        if let Some(appointments) = cached {
            debug!("Serving {} cached appointments for {}", appointments.len(), pro_id);
            return Ok(appointments);
        }

        self.refresh(backend, pro_id, since).await
    }

    async fn refresh(
        &self,
        backend: &dyn Backend,
        pro_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> ScheduleResult<Vec<Appointment>> {
        let generation = self.lock().entry(pro_id).or_default().generation;

        let query = AppointmentQuery::for_pro(pro_id).since(since);
        let appointments = backend.list_appointments(query).await?;
        debug!("Fetched {} appointments for {}", appointments.len(), pro_id);

        let mut entries = self.lock();
        let entry = entries.entry(pro_id).or_default();
        if entry.generation == generation {
            entry.snapshot = Some(Snapshot {
                appointments: appointments.clone(),
                since,
                fetched_at: Utc::now(),
            });
        } else {
            debug!("Appointments for {} changed during fetch, not caching", pro_id);
        }
        Ok(appointments)
    }

    pub fn invalidate(&self, pro_id: Uuid) {
        let mut entries = self.lock();
        let entry = entries.entry(pro_id).or_default();
        entry.generation = entry.generation.wrapping_add(1);
        entry.snapshot = None;
    }

    /// Last known status of an appointment, refetching the unfiltered list
    /// when the snapshot is stale or does not contain it.
    async fn current_status(
        &self,
        backend: &dyn Backend,
        pro_id: Uuid,
        id: Uuid,
    ) -> ScheduleResult<AppointmentStatus> {
        let cached = self.fresh_snapshot(pro_id, |snapshot| snapshot.status_of(id));
        if let Some(status) = cached {
            return Ok(status);
        }

        self.refresh(backend, pro_id, None)
            .await?
            .iter()
            .find(|appointment| appointment.id == id)
            .map(|appointment| appointment.status)
            .ok_or_else(|| ScheduleError::NotFound(format!("Appointment with ID {} not found", id)))
    }

    /// Validates `action` against the current status and persists the new one.
    ///
    /// Only one action per appointment may be in flight. An invalid transition
    /// never reaches the backend.
    pub async fn transition(
        &self,
        backend: &dyn Backend,
        in_flight: &InFlight,
        pro_id: Uuid,
        id: Uuid,
        action: AppointmentAction,
    ) -> ScheduleResult<TransitionResponse> {
        let _guard = in_flight.try_acquire(EntityKey::Appointment(id))?;

        let current = self.current_status(backend, pro_id, id).await?;
        let target = lifecycle::transition(current, action)?;

        backend.update_appointment_status(id, target).await?;
        self.invalidate(pro_id);
        info!("Appointment {} moved from {} to {}", id, current, target);

        Ok(TransitionResponse { id, status: target })
    }
}
