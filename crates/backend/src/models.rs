use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use slotwise_core::models::{
    appointment::AppointmentStatus, block::DATE_FORMAT, schedule::ScheduleSlot,
};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePayload {
    pub pro_id: Uuid,
    pub schedules: Vec<ScheduleSlot>,
}

/// Create/delete body for a date block, keyed by its local `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayload {
    pub pro_id: Uuid,
    pub date: String,
}

impl BlockPayload {
    pub fn new(pro_id: Uuid, date: NaiveDate) -> Self {
        Self {
            pro_id,
            date: date.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        }
    }
}

/// Filter for `GET appointments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentQuery {
    pub pro_id: Uuid,
    pub gte: Option<DateTime<Utc>>,
    pub order_by: Option<String>,
    pub order_direction: Option<OrderDirection>,
}

impl AppointmentQuery {
    pub fn for_pro(pro_id: Uuid) -> Self {
        Self {
            pro_id,
            gte: None,
            order_by: Some("appointment_at".to_string()),
            order_direction: Some(OrderDirection::Asc),
        }
    }

    pub fn since(mut self, gte: Option<DateTime<Utc>>) -> Self {
        self.gte = gte;
        self
    }

    /// Query string pairs in the backend's parameter naming.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("pro_id", self.pro_id.to_string())];
        if let Some(gte) = self.gte {
            params.push(("gte", gte.to_rfc3339()));
        }
        if let Some(order_by) = &self.order_by {
            params.push(("orderBy", order_by.clone()));
        }
        if let Some(direction) = self.order_direction {
            params.push(("orderDirection", direction.as_str().to_string()));
        }
        params
    }
}
