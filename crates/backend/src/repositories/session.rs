use slotwise_core::{errors::ScheduleResult, models::session::Session};
use uuid::Uuid;

use crate::client::BackendClient;

pub async fn list_sessions(client: &BackendClient, pro_id: Uuid) -> ScheduleResult<Vec<Session>> {
    client
        .get_json("/sessions", &[("pro_id", pro_id.to_string())])
        .await
}
