//! Read-side projection of appointments into agenda buckets.
//!
//! Classification depends only on the records and the supplied `now`, so a
//! confirmed appointment moves from upcoming to historic exactly when `now`
//! passes its end time. Pending requests stay actionable regardless of age.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    appointment::{Appointment, AppointmentStatus},
    session::Session,
};

pub const DEFAULT_SESSION_MINUTES: i64 = 30;
const MAX_SESSION_MINUTES: i64 = 24 * 60;

/// Minutes encoded by a session type such as `"45m"` or `"1h"`.
/// Missing, unparseable or longer-than-a-day values fall back to 30 minutes.
pub fn duration_minutes(session_type: Option<&str>) -> i64 {
    let Some(raw) = session_type.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_SESSION_MINUTES;
    };

    let (number, unit_minutes) = if let Some(n) = raw.strip_suffix('m') {
        (n, 1)
    } else if let Some(n) = raw.strip_suffix('h') {
        (n, 60)
    } else {
        return DEFAULT_SESSION_MINUTES;
    };

    number
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .and_then(|n| n.checked_mul(unit_minutes))
        .filter(|minutes| *minutes <= MAX_SESSION_MINUTES)
        .unwrap_or(DEFAULT_SESSION_MINUTES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    ConfirmedUpcoming,
    PendingUpcoming,
    Historic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgendaOrder {
    pub upcoming: SortDirection,
    pub historic: SortDirection,
}

impl Default for AgendaOrder {
    fn default() -> Self {
        Self {
            upcoming: SortDirection::Ascending,
            historic: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Agenda {
    pub confirmed_upcoming: Vec<Appointment>,
    pub pending_upcoming: Vec<Appointment>,
    pub historic: Vec<Appointment>,
}

impl Agenda {
    pub fn len(&self) -> usize {
        self.confirmed_upcoming.len() + self.pending_upcoming.len() + self.historic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classifies with the default ordering and no session catalogue.
pub fn classify(appointments: &[Appointment], now: DateTime<Utc>) -> Agenda {
    AppointmentClassifier::new().classify(appointments, now)
}

/// Whether any appointment has to look its duration up in the session
/// catalogue: it links a session but carries no embedded session type.
pub fn needs_catalogue(appointments: &[Appointment]) -> bool {
    appointments.iter().any(|appointment| {
        !appointment.is_calendar_event()
            && appointment.session_type().is_none()
            && appointment.session_id.is_some()
    })
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentClassifier {
    durations: HashMap<Uuid, i64>,
    order: AgendaOrder,
}

impl AppointmentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the catalogue for appointments that carry no embedded session.
    pub fn with_sessions(mut self, sessions: &[Session]) -> Self {
        self.durations = sessions
            .iter()
            .map(|session| (session.id, duration_minutes(Some(&session.session_type))))
            .collect();
        self
    }

    pub fn with_order(mut self, order: AgendaOrder) -> Self {
        self.order = order;
        self
    }

    pub fn duration_of(&self, appointment: &Appointment) -> i64 {
        let embedded = appointment.session_type();
        if embedded.is_some() {
            return duration_minutes(embedded);
        }

        appointment
            .session_id
            .and_then(|id| self.durations.get(&id).copied())
            .unwrap_or(DEFAULT_SESSION_MINUTES)
    }

    pub fn end_time(&self, appointment: &Appointment) -> DateTime<Utc> {
        appointment.appointment_at + Duration::minutes(self.duration_of(appointment))
    }

    /// `None` for calendar events, which are never bookable appointments.
    pub fn bucket(&self, appointment: &Appointment, now: DateTime<Utc>) -> Option<Bucket> {
        if appointment.is_calendar_event() {
            return None;
        }

        let bucket = match appointment.status {
            AppointmentStatus::Pending => Bucket::PendingUpcoming,
            AppointmentStatus::Confirmed if self.end_time(appointment) > now => {
                Bucket::ConfirmedUpcoming
            }
            AppointmentStatus::Confirmed
            | AppointmentStatus::Cancelled
            | AppointmentStatus::Completed => Bucket::Historic,
        };
        Some(bucket)
    }

    pub fn classify(&self, appointments: &[Appointment], now: DateTime<Utc>) -> Agenda {
        let mut agenda = Agenda::default();
        for appointment in appointments {
            let target = match self.bucket(appointment, now) {
                Some(Bucket::ConfirmedUpcoming) => &mut agenda.confirmed_upcoming,
                Some(Bucket::PendingUpcoming) => &mut agenda.pending_upcoming,
                Some(Bucket::Historic) => &mut agenda.historic,
                None => continue,
            };
            target.push(appointment.clone());
        }

        sort_by_start(&mut agenda.confirmed_upcoming, self.order.upcoming);
        sort_by_start(&mut agenda.pending_upcoming, self.order.upcoming);
        sort_by_start(&mut agenda.historic, self.order.historic);
        agenda
    }

    /// Earliest future instant at which a confirmed appointment becomes
    /// historic; the agenda must be re-evaluated then.
    pub fn next_boundary(
        &self,
        appointments: &[Appointment],
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        appointments
            .iter()
            .filter(|a| !a.is_calendar_event() && a.status == AppointmentStatus::Confirmed)
            .map(|a| self.end_time(a))
            .filter(|end| *end > now)
            .min()
    }
}

fn sort_by_start(appointments: &mut [Appointment], direction: SortDirection) {
    match direction {
        SortDirection::Ascending => appointments.sort_by_key(|a| a.appointment_at),
        SortDirection::Descending => {
            appointments.sort_by(|a, b| b.appointment_at.cmp(&a.appointment_at))
        }
    }
}
