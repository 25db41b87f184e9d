use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use slotwise_core::{
    errors::ScheduleError,
    models::block::{
        BlockAction, BlockCheckResponse, DATE_FORMAT, DateBlock, ToggleBlockRequest,
        ToggleBlockResponse,
    },
    scheduling::blocks::{DateBlockRegistry, local_date_key},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::error_handling::AppError,
    services::{dates, in_flight::EntityKey},
};

#[derive(Debug, Deserialize)]
pub struct BlockCheckQuery {
    /// RFC 3339 timestamp or `YYYY-MM-DD`; today when absent.
    pub at: Option<String>,
    pub tz: Option<String>,
}

/// Server-confirmed blocked dates, ascending.
#[axum::debug_handler]
pub async fn list_blocks(
    State(state): State<Arc<ApiState>>,
    Path(pro_id): Path<Uuid>,
) -> Result<Json<Vec<DateBlock>>, AppError> {
    let blocks = state.backend.list_blocks(pro_id).await?;
    let registry = DateBlockRegistry::from_blocks(pro_id, &blocks);
    Ok(Json(registry.to_blocks()))
}

#[axum::debug_handler]
pub async fn check_block(
    State(state): State<Arc<ApiState>>,
    Path(pro_id): Path<Uuid>,
    Query(query): Query<BlockCheckQuery>,
) -> Result<Json<BlockCheckResponse>, AppError> {
    let date = dates::resolve_local_date(
        query.at.as_deref(),
        query.tz.as_deref(),
        state.settings.default_timezone,
        Utc::now(),
    )?;

    let blocks = state.backend.list_blocks(pro_id).await?;
    let registry = DateBlockRegistry::from_blocks(pro_id, &blocks);

    Ok(Json(BlockCheckResponse {
        date: local_date_key(&date),
        blocked: registry.is_blocked(&date),
    }))
}

/// Brings the blocked state of one local date to `blocked`.
///
/// Nothing is sent to the backend when the date is already in the desired
/// state. Only one toggle per date may be in flight.
#[axum::debug_handler]
pub async fn toggle_block(
    State(state): State<Arc<ApiState>>,
    Path((pro_id, date)): Path<(Uuid, String)>,
    Json(payload): Json<ToggleBlockRequest>,
) -> Result<Json<ToggleBlockResponse>, AppError> {
    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
        .map_err(|_| ScheduleError::InvalidFormat(format!("expected YYYY-MM-DD, got {:?}", date)))?;
    let _guard = state
        .in_flight
        .try_acquire(EntityKey::Block { pro_id, date })?;

    let blocks = state.backend.list_blocks(pro_id).await?;
    let mut registry = DateBlockRegistry::from_blocks(pro_id, &blocks);
    let action = registry.plan(date, payload.blocked);

    if let Some(action) = action {
        match action {
            BlockAction::Create => state.backend.create_block(pro_id, date).await?,
            BlockAction::Delete => state.backend.delete_block(pro_id, date).await?,
        }
        registry.apply_confirmed(date, action);
        info!(
            "Block {:?} applied for {} on {}",
            action,
            pro_id,
            local_date_key(&date)
        );
    }

    Ok(Json(ToggleBlockResponse {
        date: local_date_key(&date),
        blocked: registry.contains(date),
        action,
    }))
}
