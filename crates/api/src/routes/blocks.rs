use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/pros/:pro_id/blocks", get(handlers::blocks::list_blocks))
        .route(
            "/api/pros/:pro_id/blocks/check",
            get(handlers::blocks::check_block),
        )
        .route(
            "/api/pros/:pro_id/blocks/:date",
            put(handlers::blocks::toggle_block),
        )
}
