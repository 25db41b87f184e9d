use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use slotwise_core::models::{
    schedule::{
        AddSlotRequest, AddSlotResponse, DayOfWeek, EndTimeOptionsResponse,
        ScheduleDraftResponse, ScheduleSlot, SlotTakenResponse, UpdateSlotRequest,
    },
    time_slot::ClockTime,
};
use slotwise_core::scheduling::validator::{is_slot_taken, valid_end_time_options};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError, services::dates};

#[derive(Debug, Deserialize)]
pub struct EndTimesQuery {
    pub start: String,
    pub granularity: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct SlotTakenQuery {
    pub day: u8,
    pub start: String,
    pub exclude: Option<Uuid>,
}

/// End times offered for a slot starting at `start`.
#[axum::debug_handler]
pub async fn end_time_options(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<EndTimesQuery>,
) -> Result<Json<EndTimeOptionsResponse>, AppError> {
    let start: ClockTime = query.start.parse()?;
    let granularity = query
        .granularity
        .unwrap_or(state.settings.slot_defaults.granularity_minutes);

    Ok(Json(EndTimeOptionsResponse {
        start,
        granularity,
        options: valid_end_time_options(start, granularity).collect(),
    }))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<ApiState>>,
    Path(pro_id): Path<Uuid>,
) -> Result<Json<ScheduleDraftResponse>, AppError> {
    let draft = state.drafts.view(state.backend.as_ref(), pro_id).await?;
    Ok(Json(draft))
}

/// Adds a slot on the local weekday of the requested date.
#[axum::debug_handler]
pub async fn add_slot(
    State(state): State<Arc<ApiState>>,
    Path(pro_id): Path<Uuid>,
    Json(payload): Json<AddSlotRequest>,
) -> Result<Json<AddSlotResponse>, AppError> {
    let date = dates::resolve_local_date(
        payload.date.as_deref(),
        payload.tz.as_deref(),
        state.settings.default_timezone,
        Utc::now(),
    )?;
    let defaults = state.settings.slot_defaults;

    let (slot, schedule) = state
        .drafts
        .edit(state.backend.as_ref(), pro_id, |current| {
            current.add_slot_local(&date, &defaults)
        })
        .await?;

    Ok(Json(AddSlotResponse { slot, schedule }))
}

#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<Arc<ApiState>>,
    Path((pro_id, slot_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateSlotRequest>,
) -> Result<Json<ScheduleDraftResponse>, AppError> {
    let value: ClockTime = payload.value.parse()?;

    let ((), schedule) = state
        .drafts
        .edit(state.backend.as_ref(), pro_id, |current| {
            let next = current.update_slot(slot_id, payload.field, value)?;
            Ok((next, ()))
        })
        .await?;

    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn remove_slot(
    State(state): State<Arc<ApiState>>,
    Path((pro_id, slot_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ScheduleDraftResponse>, AppError> {
    let ((), schedule) = state
        .drafts
        .edit(state.backend.as_ref(), pro_id, |current| {
            Ok((current.remove_slot(slot_id), ()))
        })
        .await?;

    Ok(Json(schedule))
}

/// Whether a start time collides with another slot of the same weekday.
#[axum::debug_handler]
pub async fn slot_taken(
    State(state): State<Arc<ApiState>>,
    Path(pro_id): Path<Uuid>,
    Query(query): Query<SlotTakenQuery>,
) -> Result<Json<SlotTakenResponse>, AppError> {
    let day = DayOfWeek::new(query.day)?;
    let start: ClockTime = query.start.parse()?;

    let taken = state
        .drafts
        .inspect(state.backend.as_ref(), pro_id, |current| {
            let slots: Vec<ScheduleSlot> = current.day(day).into_iter().cloned().collect();
            is_slot_taken(start, query.exclude, &slots)
        })
        .await?;

    Ok(Json(SlotTakenResponse { taken }))
}

#[axum::debug_handler]
pub async fn save_schedule(
    State(state): State<Arc<ApiState>>,
    Path(pro_id): Path<Uuid>,
) -> Result<Json<ScheduleDraftResponse>, AppError> {
    let draft = state
        .drafts
        .save(state.backend.as_ref(), &state.in_flight, pro_id)
        .await?;
    Ok(Json(draft))
}

#[axum::debug_handler]
pub async fn discard_schedule(
    State(state): State<Arc<ApiState>>,
    Path(pro_id): Path<Uuid>,
) -> Result<Json<ScheduleDraftResponse>, AppError> {
    let draft = state.drafts.discard(state.backend.as_ref(), pro_id).await?;
    Ok(Json(draft))
}
