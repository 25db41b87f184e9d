//! # API Configuration Module
//!
//! Loads configuration for the Slotwise API server from environment
//! variables, with defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: host address to bind to (default: "0.0.0.0")
//! - `API_PORT`: port to listen on (default: 3000)
//! - `BACKEND_URL`: base URL of the scheduling backend (required)
//! - `BACKEND_API_TOKEN`: bearer token sent to the backend
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `API_CORS_ORIGINS`: comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: request timeout (default: 30)
//! - `SLOT_GRANULARITY_MINUTES`: end-time picker step and shortest slot (default: 15)
//! - `DEFAULT_SLOT_START`: preferred start of a new slot (default: "09:00")
//! - `DEFAULT_SLOT_MINUTES`: preferred length of a new slot (default: 60)
//! - `DEFAULT_TIMEZONE`: IANA zone for "today" when a request names none (default: "UTC")
//! - `APPOINTMENT_CACHE_TTL_SECONDS`: lifetime of a cached appointment list (default: 60)

use std::env;

use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use slotwise_core::{models::time_slot::ClockTime, scheduling::weekly::SlotDefaults};
use tracing::Level;

use crate::services::SchedulingSettings;

/// Configuration for the Slotwise API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use slotwise_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Base URL of the REST backend
    pub backend_url: String,

    /// Bearer token for the backend (optional)
    pub backend_token: Option<String>,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds, for both served and backend requests
    pub request_timeout: u64,

    pub slot_defaults: SlotDefaults,

    pub default_timezone: Tz,

    /// Seconds a fetched appointment list is reused
    pub appointment_cache_ttl: u32,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The BACKEND_URL environment variable is not set
    /// - A numeric value cannot be parsed
    /// - DEFAULT_SLOT_START is not `HH:MM` or DEFAULT_TIMEZONE is unknown
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // Network settings
        let host = var("API_HOST", "0.0.0.0");
        let port = var("API_PORT", "3000")
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Backend settings
        let backend_url = lookup("BACKEND_URL")
            .ok_or_else(|| eyre!("BACKEND_URL environment variable must be set"))?;
        let backend_token = lookup("BACKEND_API_TOKEN").filter(|token| !token.is_empty());

        // Logging settings
        let log_level = match var("LOG_LEVEL", "info").as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS")
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS", "30")
            .parse()
            .wrap_err("Invalid API_REQUEST_TIMEOUT_SECONDS value")?;

        // Scheduling settings
        let granularity_minutes: u16 = var("SLOT_GRANULARITY_MINUTES", "15")
            .parse()
            .wrap_err("Invalid SLOT_GRANULARITY_MINUTES value")?;
        if granularity_minutes == 0 {
            return Err(eyre!("SLOT_GRANULARITY_MINUTES must be greater than zero"));
        }
        let preferred_start: ClockTime = var("DEFAULT_SLOT_START", "09:00")
            .parse()
            .wrap_err("Invalid DEFAULT_SLOT_START value")?;
        let length_minutes = var("DEFAULT_SLOT_MINUTES", "60")
            .parse()
            .wrap_err("Invalid DEFAULT_SLOT_MINUTES value")?;

        let timezone = var("DEFAULT_TIMEZONE", "UTC");
        let default_timezone = timezone
            .parse::<Tz>()
            .map_err(|_| eyre!("Unknown DEFAULT_TIMEZONE: {}", timezone))?;

        let appointment_cache_ttl = var("APPOINTMENT_CACHE_TTL_SECONDS", "60")
            .parse()
            .wrap_err("Invalid APPOINTMENT_CACHE_TTL_SECONDS value")?;

        Ok(Self {
            host,
            port,
            backend_url,
            backend_token,
            log_level,
            cors_origins,
            request_timeout,
            slot_defaults: SlotDefaults {
                preferred_start,
                length_minutes,
                granularity_minutes,
            },
            default_timezone,
            appointment_cache_ttl,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn scheduling_settings(&self) -> SchedulingSettings {
        SchedulingSettings {
            slot_defaults: self.slot_defaults,
            default_timezone: self.default_timezone,
            appointment_cache_ttl: chrono::Duration::seconds(i64::from(
                self.appointment_cache_ttl,
            )),
        }
    }
}
