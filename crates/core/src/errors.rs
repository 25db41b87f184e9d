use std::fmt;

use thiserror::Error;

use crate::models::appointment::AppointmentStatus;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Invalid range: end {end} must be after start {start}")]
    InvalidRange { start: String, end: String },

    #[error("Invalid day of week: {0}")]
    InvalidDay(u8),

    #[error("Slot {start}-{end} overlaps an existing slot on day {day}")]
    Overlap { day: u8, start: String, end: String },

    #[error("No available slot left on day {0}")]
    NoAvailableSlot(u8),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Operation already in progress: {0}")]
    Busy(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    Transport(#[from] eyre::Report),
}

/// Coarse error families callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Transition,
    NotFound,
    Transport,
}

impl ScheduleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::InvalidFormat(_)
            | ScheduleError::InvalidRange { .. }
            | ScheduleError::InvalidDay(_) => ErrorKind::Validation,
            ScheduleError::Overlap { .. }
            | ScheduleError::NoAvailableSlot(_)
            | ScheduleError::Conflict(_)
            | ScheduleError::Busy(_) => ErrorKind::Conflict,
            ScheduleError::InvalidTransition { .. } => ErrorKind::Transition,
            ScheduleError::NotFound(_) => ErrorKind::NotFound,
            ScheduleError::Transport(_) => ErrorKind::Transport,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Transition => "transition",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Transport => "transport",
        };
        f.write_str(name)
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
