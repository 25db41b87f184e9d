use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use slotwise_core::{
    models::appointment::{AgendaQuery, AgendaResponse, TransitionResponse},
    scheduling::{
        classifier::{self, AppointmentClassifier},
        lifecycle::AppointmentAction,
    },
};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Appointments of a professional split into confirmed upcoming, pending
/// upcoming and historic, evaluated at `now` (the current time by default).
#[axum::debug_handler]
pub async fn agenda(
    State(state): State<Arc<ApiState>>,
    Path(pro_id): Path<Uuid>,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<AgendaResponse>, AppError> {
    let now = query.now.unwrap_or_else(Utc::now);

    let appointments = state
        .appointments
        .list(state.backend.as_ref(), pro_id, query.since)
        .await?;
    let mut classifier = AppointmentClassifier::new();
    if classifier::needs_catalogue(&appointments) {
        let sessions = state.backend.list_sessions(pro_id).await?;
        classifier = classifier.with_sessions(&sessions);
    }

    let agenda = classifier.classify(&appointments, now);

    Ok(Json(AgendaResponse {
        now,
        confirmed_upcoming: agenda.confirmed_upcoming,
        pending_upcoming: agenda.pending_upcoming,
        historic: agenda.historic,
        refresh_at: classifier.next_boundary(&appointments, now),
    }))
}

#[axum::debug_handler]
pub async fn confirm_appointment(
    State(state): State<Arc<ApiState>>,
    Path((pro_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TransitionResponse>, AppError> {
    apply(&state, pro_id, id, AppointmentAction::Confirm).await
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path((pro_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TransitionResponse>, AppError> {
    apply(&state, pro_id, id, AppointmentAction::Cancel).await
}

async fn apply(
    state: &ApiState,
    pro_id: Uuid,
    id: Uuid,
    action: AppointmentAction,
) -> Result<Json<TransitionResponse>, AppError> {
    let response = state
        .appointments
        .transition(state.backend.as_ref(), &state.in_flight, pro_id, id, action)
        .await?;
    Ok(Json(response))
}
