//! Resolution of request dates into local calendar days.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use slotwise_core::{
    errors::{ScheduleError, ScheduleResult},
    models::block::DATE_FORMAT,
    scheduling::blocks::local_date,
};

pub fn parse_timezone(name: &str) -> ScheduleResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidFormat(format!("Unknown timezone: {}", name)))
}

/// Local calendar day named by a request.
///
/// An RFC 3339 timestamp keeps its own offset unless `tz` is given, in which
/// case it is converted into that zone first. A bare `YYYY-MM-DD` is taken as
/// is. Without any input the day is "today" in `tz`, or in `default_tz`.
pub fn resolve_local_date(
    input: Option<&str>,
    tz: Option<&str>,
    default_tz: Tz,
    now: DateTime<Utc>,
) -> ScheduleResult<NaiveDate> {
    let zone = tz.map(parse_timezone).transpose()?;

    let Some(input) = input.map(str::trim).filter(|value| !value.is_empty()) else {
        let today = now.with_timezone(&zone.unwrap_or(default_tz));
        return local_day(&today);
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return match zone {
            Some(zone) => local_day(&timestamp.with_timezone(&zone)),
            None => local_day(&timestamp),
        };
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| {
        ScheduleError::InvalidFormat(format!(
            "Expected an RFC 3339 timestamp or YYYY-MM-DD, got {}",
            input
        ))
    })
}

fn local_day<D: chrono::Datelike>(date: &D) -> ScheduleResult<NaiveDate> {
    local_date(date).ok_or_else(|| ScheduleError::InvalidFormat("Date out of range".to_string()))
}
