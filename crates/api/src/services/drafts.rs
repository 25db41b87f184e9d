//! Per-professional weekly schedule drafts.
//!
//! Edits are applied to a local copy and only reach the backend on an explicit
//! save. The draft of a professional is loaded from the backend the first time
//! it is touched.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use slotwise_backend::Backend;
use slotwise_core::{
    errors::{ScheduleError, ScheduleResult},
    models::schedule::ScheduleDraftResponse,
    scheduling::{optimistic::Optimistic, weekly::WeeklySchedule},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::in_flight::{EntityKey, InFlight};

type Drafts = HashMap<Uuid, Optimistic<WeeklySchedule>>;

#[derive(Debug, Default)]
pub struct ScheduleDrafts {
    drafts: Mutex<Drafts>,
}

impl ScheduleDrafts {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Drafts> {
        self.drafts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn ensure_loaded(&self, backend: &dyn Backend, pro_id: Uuid) -> ScheduleResult<()> {
        let loaded = self.lock().contains_key(&pro_id);
        if loaded {
            return Ok(());
        }

        let slots = backend.fetch_schedule(pro_id).await?;
        debug!("Loaded {} schedule slots for {}", slots.len(), pro_id);
        let schedule = WeeklySchedule::from_slots(slots);
        self.lock()
            .entry(pro_id)
            .or_insert_with(|| Optimistic::new(schedule));
        Ok(())
    }

    /// Runs `f` against the loaded draft under the lock.
    async fn with_draft<T>(
        &self,
        backend: &dyn Backend,
        pro_id: Uuid,
        f: impl FnOnce(&mut Optimistic<WeeklySchedule>) -> ScheduleResult<T>,
    ) -> ScheduleResult<T> {
        self.ensure_loaded(backend, pro_id).await?;
        let mut drafts = self.lock();
        let draft = drafts
            .get_mut(&pro_id)
            .ok_or_else(|| ScheduleError::NotFound(format!("Schedule draft for {}", pro_id)))?;
        f(draft)
    }

    pub async fn view(
        &self,
        backend: &dyn Backend,
        pro_id: Uuid,
    ) -> ScheduleResult<ScheduleDraftResponse> {
        self.with_draft(backend, pro_id, |draft| Ok(draft_response(pro_id, draft)))
            .await
    }

    /// Read access to the current (locally edited) schedule.
    pub async fn inspect<T>(
        &self,
        backend: &dyn Backend,
        pro_id: Uuid,
        f: impl FnOnce(&WeeklySchedule) -> T,
    ) -> ScheduleResult<T> {
        self.with_draft(backend, pro_id, |draft| Ok(f(draft.current())))
            .await
    }

    /// Applies a local edit. `f` receives the current schedule and returns the
    /// next one along with a value handed back to the caller; a failed edit
    /// leaves the draft untouched.
    pub async fn edit<T>(
        &self,
        backend: &dyn Backend,
        pro_id: Uuid,
        f: impl FnOnce(&WeeklySchedule) -> ScheduleResult<(WeeklySchedule, T)>,
    ) -> ScheduleResult<(T, ScheduleDraftResponse)> {
        self.with_draft(backend, pro_id, |draft| {
            let (next, output) = f(draft.current())?;
            draft.stage(next);
            Ok((output, draft_response(pro_id, draft)))
        })
        .await
    }

    /// Persists the current schedule. The payload is derived at submission
    /// time; the first save of a professional creates the schedule, later ones
    /// replace it. On failure every local edit is rolled back. Only one save
    /// per professional may be in flight.
    pub async fn save(
        &self,
        backend: &dyn Backend,
        in_flight: &InFlight,
        pro_id: Uuid,
    ) -> ScheduleResult<ScheduleDraftResponse> {
        let _guard = in_flight.try_acquire(EntityKey::ScheduleSave(pro_id))?;

        let (payload, create) = self
            .with_draft(backend, pro_id, |draft| {
                draft.current().validate()?;
                let create = draft.server().is_empty();
                let submitted = draft
                    .begin()
                    .ok_or_else(|| ScheduleError::Busy(format!("schedule save for {}", pro_id)))?;
                Ok((submitted.slots(), create))
            })
            .await?;

        let mut pending = PendingSave {
            drafts: self,
            pro_id,
            armed: true,
        };
        let result = if create {
            backend.create_schedule(pro_id, payload).await
        } else {
            backend.replace_schedule(pro_id, payload).await
        };
        pending.armed = false;

        let mut drafts = self.lock();
        let draft = drafts
            .get_mut(&pro_id)
            .ok_or_else(|| ScheduleError::NotFound(format!("Schedule draft for {}", pro_id)))?;
        match result {
            Ok(()) => {
                draft.settle_ok();
                info!("Saved schedule for {}", pro_id);
                Ok(draft_response(pro_id, draft))
            }
            Err(err) => {
                draft.settle_err();
                warn!("Schedule save for {} failed, local edits rolled back: {}", pro_id, err);
                Err(err)
            }
        }
    }

    /// Drops unsaved local edits.
    pub async fn discard(
        &self,
        backend: &dyn Backend,
        pro_id: Uuid,
    ) -> ScheduleResult<ScheduleDraftResponse> {
        self.with_draft(backend, pro_id, |draft| {
            draft.discard();
            Ok(draft_response(pro_id, draft))
        })
        .await
    }
}

/// Rolls back a save whose request future was dropped before it settled.
struct PendingSave<'a> {
    drafts: &'a ScheduleDrafts,
    pro_id: Uuid,
    armed: bool,
}

impl Drop for PendingSave<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(draft) = self.drafts.lock().get_mut(&self.pro_id) {
            draft.settle_err();
        }
    }
}

fn draft_response(pro_id: Uuid, draft: &Optimistic<WeeklySchedule>) -> ScheduleDraftResponse {
    ScheduleDraftResponse {
        pro_id,
        dirty: draft.is_dirty(),
        saving: draft.is_pending(),
        days: draft.current().days(),
    }
}
