use chrono::NaiveDate;
use reqwest::Method;
use slotwise_core::{errors::ScheduleResult, models::block::DateBlock};
use uuid::Uuid;

use crate::{client::BackendClient, models::BlockPayload};

pub async fn list_blocks(client: &BackendClient, pro_id: Uuid) -> ScheduleResult<Vec<DateBlock>> {
    client
        .get_json("/appointment-blocks", &[("pro_id", pro_id.to_string())])
        .await
}

pub async fn create_block(client: &BackendClient, pro_id: Uuid, date: NaiveDate) -> ScheduleResult<()> {
    let payload = BlockPayload::new(pro_id, date);
    tracing::debug!("Creating date block: pro_id={}, date={}", pro_id, payload.date);
    client
        .send_json(Method::POST, "/appointment-blocks", &payload)
        .await
}

pub async fn delete_block(client: &BackendClient, pro_id: Uuid, date: NaiveDate) -> ScheduleResult<()> {
    let payload = BlockPayload::new(pro_id, date);
    tracing::debug!("Deleting date block: pro_id={}, date={}", pro_id, payload.date);
    client
        .send_json(Method::DELETE, "/appointment-blocks", &payload)
        .await
}
