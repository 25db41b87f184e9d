//! Stateful services behind the handlers: schedule drafts, the appointment
//! snapshot cache and per-entity in-flight guards.

pub mod appointments;
pub mod dates;
pub mod drafts;
pub mod in_flight;

use chrono::Duration;
use chrono_tz::Tz;
use slotwise_core::scheduling::weekly::SlotDefaults;

/// Scheduling knobs resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulingSettings {
    pub slot_defaults: SlotDefaults,
    /// Zone used for "today" when a request carries neither an offset nor a zone.
    pub default_timezone: Tz,
    pub appointment_cache_ttl: Duration,
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        Self {
            slot_defaults: SlotDefaults::default(),
            default_timezone: Tz::UTC,
            appointment_cache_ttl: Duration::seconds(60),
        }
    }
}
