use reqwest::Method;
use slotwise_core::{
    errors::ScheduleResult,
    models::appointment::{Appointment, AppointmentStatus},
};
use uuid::Uuid;

use crate::{
    client::BackendClient,
    models::{AppointmentQuery, StatusUpdate},
};

pub async fn list_appointments(
    client: &BackendClient,
    query: &AppointmentQuery,
) -> ScheduleResult<Vec<Appointment>> {
    let appointments: Vec<Appointment> = client.get_json("/appointments", &query.params()).await?;

    tracing::debug!(
        "Appointments fetched: pro_id={}, count={}",
        query.pro_id,
        appointments.len()
    );
    Ok(appointments)
}

pub async fn update_appointment_status(
    client: &BackendClient,
    id: Uuid,
    status: AppointmentStatus,
) -> ScheduleResult<()> {
    tracing::debug!("Updating appointment status: id={}, status={}", id, status);
    client
        .send_json(
            Method::PUT,
            &format!("/appointments/{}", id),
            &StatusUpdate { status },
        )
        .await
}
