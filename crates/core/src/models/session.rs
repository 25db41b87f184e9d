use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::ScheduleError;

/// Length of a bookable session as offered by a professional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionDuration {
    #[serde(rename = "15m")]
    Minutes15,
    #[serde(rename = "30m")]
    Minutes30,
    #[serde(rename = "45m")]
    Minutes45,
    #[serde(rename = "60m")]
    Minutes60,
}

impl SessionDuration {
    pub fn minutes(self) -> i64 {
        match self {
            SessionDuration::Minutes15 => 15,
            SessionDuration::Minutes30 => 30,
            SessionDuration::Minutes45 => 45,
            SessionDuration::Minutes60 => 60,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionDuration::Minutes15 => "15m",
            SessionDuration::Minutes30 => "30m",
            SessionDuration::Minutes45 => "45m",
            SessionDuration::Minutes60 => "60m",
        }
    }
}

impl FromStr for SessionDuration {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "15m" => Ok(SessionDuration::Minutes15),
            "30m" => Ok(SessionDuration::Minutes30),
            "45m" => Ok(SessionDuration::Minutes45),
            "60m" => Ok(SessionDuration::Minutes60),
            other => Err(ScheduleError::InvalidFormat(format!(
                "unknown session type {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for SessionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionNature {
    OneTime,
    Subscription,
}

/// A professional's session template (duration, price, nature).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub pro_id: Uuid,
    pub price: f64,
    /// Usually one of `15m|30m|45m|60m`; other values are kept as sent.
    pub session_type: String,
    pub session_nature: SessionNature,
    #[serde(default)]
    pub is_active: bool,
    /// Feature flags and other attributes the scheduling core does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    /// The standard length this session is offered at, if it is one.
    pub fn duration(&self) -> Option<SessionDuration> {
        self.session_type.parse().ok()
    }
}

/// The part of a session embedded in an appointment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(default)]
    pub session_type: Option<String>,
}
