use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::session::SessionSummary;

/// Record type of externally synced calendar events mixed into appointment lists.
pub const CALENDAR_EVENT_TYPE: &str = "calendar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::Completed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    #[serde(default)]
    pub patient_id: Option<Uuid>,
    pub pro_id: Uuid,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub appointment_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSummary>,
}

impl Appointment {
    pub fn is_calendar_event(&self) -> bool {
        self.kind.as_deref() == Some(CALENDAR_EVENT_TYPE)
    }

    /// Session type carried by the embedded session summary.
    pub fn session_type(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|session| session.session_type.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgendaQuery {
    /// Evaluation instant; the server clock when absent.
    pub now: Option<DateTime<Utc>>,
    /// Lower bound forwarded to the backend as `gte`.
    pub since: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaResponse {
    pub now: DateTime<Utc>,
    pub confirmed_upcoming: Vec<Appointment>,
    pub pending_upcoming: Vec<Appointment>,
    pub historic: Vec<Appointment>,
    /// Next instant at which a confirmed appointment moves to historic.
    pub refresh_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionResponse {
    pub id: Uuid,
    pub status: AppointmentStatus,
}
