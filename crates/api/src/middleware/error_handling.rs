//! # Error Handling Middleware
//!
//! Maps scheduling errors to HTTP status codes and JSON error bodies, so every
//! handler reports failures the same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use slotwise_core::errors::{ErrorKind, ScheduleError};
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps a `ScheduleError` and implements `IntoResponse`, so
/// handlers can use `?` on any `ScheduleResult`.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use slotwise_api::middleware::error_handling::AppError;
/// use slotwise_core::errors::ScheduleError;
///
/// async fn handler(found: bool) -> Result<Json<bool>, AppError> {
///     if !found {
///         return Err(AppError(ScheduleError::NotFound("slot".to_string())));
///     }
///     Ok(Json(true))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ScheduleError);

/// HTTP status for each error family.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Transition => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Transport => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        if kind == ErrorKind::Transport {
            error!("Backend failure: {:?}", self.0);
        }

        let body = Json(json!({
            "error": self.0.to_string(),
            "kind": kind.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Automatic conversion from ScheduleError to AppError
impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError, as a transport failure
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ScheduleError::Transport(err))
    }
}

/// Maps a ScheduleError to an HTTP response
///
/// # Example
///
/// ```
/// use axum::http::StatusCode;
/// use slotwise_api::middleware::error_handling::map_error;
/// use slotwise_core::errors::ScheduleError;
///
/// let response = map_error(ScheduleError::Busy("appointment".to_string()));
/// assert_eq!(response.status(), StatusCode::CONFLICT);
/// ```
pub fn map_error(err: ScheduleError) -> Response {
    AppError(err).into_response()
}
