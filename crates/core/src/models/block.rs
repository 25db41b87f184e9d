use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ScheduleError, ScheduleResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar day on which the professional takes no bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub pro_id: Uuid,
    #[serde(with = "date_portion")]
    pub date: NaiveDate,
}

/// Parses the `YYYY-MM-DD` prefix of a backend date, ignoring any time part.
pub fn parse_date_portion(value: &str) -> ScheduleResult<NaiveDate> {
    let prefix = value
        .get(..10)
        .ok_or_else(|| ScheduleError::InvalidFormat(format!("expected YYYY-MM-DD, got {:?}", value)))?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT)
        .map_err(|e| ScheduleError::InvalidFormat(format!("invalid date {:?}: {}", value, e)))
}

mod date_portion {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date_portion(&raw).map_err(serde::de::Error::custom)
    }
}

/// Side effect the persistence layer must perform to reach the desired block state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockAction {
    Create,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockCheckResponse {
    pub date: String,
    pub blocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleBlockRequest {
    pub blocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleBlockResponse {
    pub date: String,
    pub blocked: bool,
    /// `None` when the date already was in the desired state.
    pub action: Option<BlockAction>,
}
