use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/schedule/end-times",
            get(handlers::schedule::end_time_options),
        )
        .route(
            "/api/pros/:pro_id/schedule",
            get(handlers::schedule::get_schedule),
        )
        .route(
            "/api/pros/:pro_id/schedule/slots",
            post(handlers::schedule::add_slot),
        )
        .route(
            "/api/pros/:pro_id/schedule/slots/:slot_id",
            patch(handlers::schedule::update_slot).delete(handlers::schedule::remove_slot),
        )
        .route(
            "/api/pros/:pro_id/schedule/taken",
            get(handlers::schedule::slot_taken),
        )
        .route(
            "/api/pros/:pro_id/schedule/save",
            post(handlers::schedule::save_schedule),
        )
        .route(
            "/api/pros/:pro_id/schedule/discard",
            post(handlers::schedule::discard_schedule),
        )
}
