use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/pros/:pro_id/appointments/agenda",
            get(handlers::appointments::agenda),
        )
        .route(
            "/api/pros/:pro_id/appointments/:id/confirm",
            post(handlers::appointments::confirm_appointment),
        )
        .route(
            "/api/pros/:pro_id/appointments/:id/cancel",
            post(handlers::appointments::cancel_appointment),
        )
}
