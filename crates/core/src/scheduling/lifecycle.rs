use tracing::{debug, warn};

use crate::{
    errors::{ScheduleError, ScheduleResult},
    models::appointment::AppointmentStatus,
};

use crate::models::appointment::AppointmentStatus::{Cancelled, Completed, Confirmed, Pending};

/// Every permitted `(from, to)` status change. Cancelled and completed are terminal.
const TRANSITIONS: &[(AppointmentStatus, AppointmentStatus)] = &[
    (Pending, Confirmed),
    (Pending, Cancelled),
    (Confirmed, Cancelled),
    (Confirmed, Completed),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Confirm,
    Cancel,
    /// Completion is recorded by the backend once a session ends; it is never
    /// requested by a professional.
    Complete,
}

impl AppointmentAction {
    pub fn target(self) -> AppointmentStatus {
        match self {
            AppointmentAction::Confirm => Confirmed,
            AppointmentAction::Cancel => Cancelled,
            AppointmentAction::Complete => Completed,
        }
    }
}

pub fn can_transition(from: AppointmentStatus, to: AppointmentStatus) -> bool {
    TRANSITIONS.contains(&(from, to))
}

pub fn valid_transitions(from: AppointmentStatus) -> Vec<AppointmentStatus> {
    TRANSITIONS
        .iter()
        .filter(|(source, _)| *source == from)
        .map(|(_, target)| *target)
        .collect()
}

/// Status reached by applying `action` to `current`, or `InvalidTransition`.
pub fn transition(
    current: AppointmentStatus,
    action: AppointmentAction,
) -> ScheduleResult<AppointmentStatus> {
    let target = action.target();
    if !can_transition(current, target) {
        warn!("Invalid status transition attempted: {} -> {}", current, target);
        return Err(ScheduleError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    debug!("Status transition validated: {} -> {}", current, target);
    Ok(target)
}

pub fn confirm(current: AppointmentStatus) -> ScheduleResult<AppointmentStatus> {
    transition(current, AppointmentAction::Confirm)
}

pub fn cancel(current: AppointmentStatus) -> ScheduleResult<AppointmentStatus> {
    transition(current, AppointmentAction::Cancel)
}

pub fn complete(current: AppointmentStatus) -> ScheduleResult<AppointmentStatus> {
    transition(current, AppointmentAction::Complete)
}
