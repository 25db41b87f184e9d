//! # Slotwise API
//!
//! The API crate provides the web server for the Slotwise scheduling core.
//! It exposes weekly schedule drafts, date blocks and the appointment agenda
//! of each professional to the web client.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into service calls
//! - **Services**: Hold per-professional drafts, cached appointments and in-flight guards
//! - **Middleware**: Error mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and talks to the persistence
//! backend through the [`slotwise_backend::Backend`] trait.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Stateful services shared by the handlers
pub mod services;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use slotwise_backend::Backend;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::services::{
    SchedulingSettings, appointments::AppointmentBook, drafts::ScheduleDrafts,
    in_flight::InFlight,
};

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use slotwise_api::{ApiState, services::SchedulingSettings};
/// use slotwise_backend::BackendClient;
///
/// # fn example(client: BackendClient) {
/// let state = Arc::new(ApiState::new(Arc::new(client), SchedulingSettings::default()));
/// let app = slotwise_api::app(state);
/// # }
/// ```
pub struct ApiState {
    /// Persistence backend for schedules, blocks, appointments and sessions
    pub backend: Arc<dyn Backend>,
    pub settings: SchedulingSettings,
    /// Unsaved weekly schedule edits, per professional
    pub drafts: ScheduleDrafts,
    pub appointments: AppointmentBook,
    /// Entities with a mutating action in flight
    pub in_flight: InFlight,
}

impl ApiState {
    pub fn new(backend: Arc<dyn Backend>, settings: SchedulingSettings) -> Self {
        Self {
            backend,
            appointments: AppointmentBook::new(settings.appointment_cache_ttl),
            settings,
            drafts: ScheduleDrafts::new(),
            in_flight: InFlight::new(),
        }
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Weekly schedule endpoints
        .merge(routes::schedule::routes())
        // Date block endpoints
        .merge(routes::blocks::routes())
        // Appointment agenda and status endpoints
        .merge(routes::appointments::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and backend
///
/// This function initializes logging, configures routes and middleware,
/// and serves HTTP until the listener fails.
///
/// # Example
///
/// ```no_run
/// use std::{sync::Arc, time::Duration};
/// use slotwise_api::config::ApiConfig;
/// use slotwise_backend::BackendClient;
///
/// # async fn example() -> eyre::Result<()> {
/// let config = ApiConfig::from_env()?;
/// let client = BackendClient::new(&config.backend_url, None, Duration::from_secs(30))?;
/// slotwise_api::start_server(config, Arc::new(client)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, backend: Arc<dyn Backend>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(backend, config.scheduling_settings()));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("Invalid API_CORS_ORIGINS entry")?;
        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request tracing and timeout
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
