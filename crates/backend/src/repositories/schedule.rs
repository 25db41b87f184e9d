use reqwest::Method;
use slotwise_core::{errors::ScheduleResult, models::schedule::ScheduleSlot};
use uuid::Uuid;

use crate::{client::BackendClient, models::SchedulePayload};

pub async fn fetch_schedule(client: &BackendClient, pro_id: Uuid) -> ScheduleResult<Vec<ScheduleSlot>> {
    tracing::debug!("Fetching weekly schedule: pro_id={}", pro_id);

    let slots: Vec<ScheduleSlot> = client
        .get_json("/schedules", &[("pro_id", pro_id.to_string())])
        .await?;

    tracing::debug!("Weekly schedule fetched: pro_id={}, slots={}", pro_id, slots.len());
    Ok(slots)
}

pub async fn create_schedule(
    client: &BackendClient,
    pro_id: Uuid,
    slots: &[ScheduleSlot],
) -> ScheduleResult<()> {
    save(client, Method::POST, pro_id, slots).await
}

pub async fn replace_schedule(
    client: &BackendClient,
    pro_id: Uuid,
    slots: &[ScheduleSlot],
) -> ScheduleResult<()> {
    save(client, Method::PUT, pro_id, slots).await
}

async fn save(
    client: &BackendClient,
    method: Method,
    pro_id: Uuid,
    slots: &[ScheduleSlot],
) -> ScheduleResult<()> {
    tracing::debug!(
        "Saving weekly schedule: pro_id={}, slots={}, method={}",
        pro_id,
        slots.len(),
        method
    );

    let payload = SchedulePayload {
        pro_id,
        schedules: slots.to_vec(),
    };
    client.send_json(method, "/schedules", &payload).await
}
