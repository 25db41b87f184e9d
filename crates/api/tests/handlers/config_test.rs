use std::collections::HashMap;

use chrono_tz::Tz;
use pretty_assertions::assert_eq;
use slotwise_api::config::ApiConfig;
use tracing::Level;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let config = ApiConfig::from_lookup(lookup(&[("BACKEND_URL", "http://backend.local")]))
        .expect("Failed to load config");

    assert_eq!(config.server_addr(), "0.0.0.0:3000");
    assert_eq!(config.backend_url, "http://backend.local");
    assert_eq!(config.backend_token, None);
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.request_timeout, 30);
    assert_eq!(config.slot_defaults.granularity_minutes, 15);
    assert_eq!(config.slot_defaults.length_minutes, 60);
    assert_eq!(config.slot_defaults.preferred_start.to_string(), "09:00");
    assert_eq!(config.default_timezone, Tz::UTC);
    assert_eq!(
        config.scheduling_settings().appointment_cache_ttl,
        chrono::Duration::seconds(60)
    );
}

#[test]
fn test_config_overrides() {
    let config = ApiConfig::from_lookup(lookup(&[
        ("BACKEND_URL", "http://backend.local"),
        ("BACKEND_API_TOKEN", "secret"),
        ("API_PORT", "8080"),
        ("LOG_LEVEL", "debug"),
        ("API_CORS_ORIGINS", "http://a.test, http://b.test"),
        ("SLOT_GRANULARITY_MINUTES", "30"),
        ("DEFAULT_SLOT_START", "08:30"),
        ("DEFAULT_TIMEZONE", "America/Sao_Paulo"),
    ]))
    .expect("Failed to load config");

    assert_eq!(config.port, 8080);
    assert_eq!(config.backend_token.as_deref(), Some("secret"));
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(
        config.cors_origins,
        Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
    );
    assert_eq!(config.slot_defaults.granularity_minutes, 30);
    assert_eq!(config.slot_defaults.preferred_start.to_string(), "08:30");
    assert_eq!(config.default_timezone, Tz::America__Sao_Paulo);
}

#[test]
fn test_config_requires_backend_url() {
    assert!(ApiConfig::from_lookup(lookup(&[])).is_err());
}

#[test]
fn test_config_rejects_invalid_scheduling_values() {
    let base = ("BACKEND_URL", "http://backend.local");

    assert!(ApiConfig::from_lookup(lookup(&[base, ("SLOT_GRANULARITY_MINUTES", "0")])).is_err());
    assert!(ApiConfig::from_lookup(lookup(&[base, ("DEFAULT_SLOT_START", "9am")])).is_err());
    assert!(ApiConfig::from_lookup(lookup(&[base, ("DEFAULT_TIMEZONE", "Nowhere/City")])).is_err());
    assert!(ApiConfig::from_lookup(lookup(&[base, ("API_PORT", "port")])).is_err());
    assert!(
        ApiConfig::from_lookup(lookup(&[base, ("API_REQUEST_TIMEOUT_SECONDS", "thirty")])).is_err()
    );
}
