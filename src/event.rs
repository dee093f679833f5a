//! Calendar event records and their serialized form.

use crate::error::{EventError, EventResult};
use crate::parser::date;
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel written in place of an unresolved date.
pub const INVALID_DATE: &str = "N/A";

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The persisted form of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedEvent {
    pub event_name: String,
    pub event_date: String,
    #[serde(default)]
    pub formatted_date: Option<String>,
}

/// One calendar entry scraped from the source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    event_name: String,
    event_date: String,
    resolved_date: Option<NaiveDateTime>,
}

impl EventRecord {
    pub fn new(event_name: impl Into<String>, event_date: impl Into<String>) -> Self {
        Self { event_name: event_name.into(), event_date: event_date.into(), resolved_date: None }
    }

    /// Build a record with an already resolved date (used when rehydrating).
    pub fn with_resolved_date(
        event_name: impl Into<String>,
        event_date: impl Into<String>,
        resolved_date: Option<NaiveDateTime>,
    ) -> Self {
        Self { event_name: event_name.into(), event_date: event_date.into(), resolved_date }
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn event_date(&self) -> &str {
        &self.event_date
    }

    pub fn resolved_date(&self) -> Option<NaiveDateTime> {
        self.resolved_date
    }

    pub fn is_unresolved(&self) -> bool {
        self.resolved_date.is_none()
    }

    /// Resolve the raw date text against `reference_year`.
    ///
    /// A record that is already resolved keeps its date. Returns whether the
    /// record ends up resolved.
    pub fn normalize_date(&mut self, reference_year: i32) -> bool {
        if self.resolved_date.is_none() {
            self.resolved_date = date::normalize(&self.event_date, reference_year);
        }
        self.resolved_date.is_some()
    }

    /// Replace the hour of the resolved date. No-op when unresolved.
    pub fn set_hour(&mut self, hour: u32) -> EventResult<()> {
        if let Some(resolved) = self.resolved_date {
            let updated = resolved.with_hour(hour).ok_or(EventError::InvalidHour(hour))?;
            self.resolved_date = Some(updated);
        }
        Ok(())
    }

    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.resolved_day() == Some(today)
    }

    pub fn is_tomorrow(&self, today: NaiveDate) -> bool {
        match (self.resolved_day(), today.succ_opt()) {
            (Some(day), Some(tomorrow)) => day == tomorrow,
            _ => false,
        }
    }

    /// True when the event falls within `[today, today + 7 days]`.
    pub fn is_this_week(&self, today: NaiveDate) -> bool {
        let Some(day) = self.resolved_day() else {
            return false;
        };
        let week_end = today.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX);
        today <= day && day <= week_end
    }

    fn resolved_day(&self) -> Option<NaiveDate> {
        self.resolved_date.map(|dt| dt.date())
    }

    pub fn serialize(&self) -> SerializedEvent {
        let formatted_date = match self.resolved_date {
            Some(dt) => format_iso(dt),
            None => INVALID_DATE.to_string(),
        };
        SerializedEvent {
            event_name: self.event_name.clone(),
            event_date: self.event_date.clone(),
            formatted_date: Some(formatted_date),
        }
    }

    pub fn deserialize(data: SerializedEvent) -> EventResult<Self> {
        let resolved_date = match data.formatted_date.as_deref() {
            None | Some("") | Some(INVALID_DATE) => None,
            Some(value) => Some(parse_iso_datetime(value)?),
        };
        Ok(Self { event_name: data.event_name, event_date: data.event_date, resolved_date })
    }
}

/// ISO-8601 text keeping any sub-second part. Whole microseconds are written
/// with six digits, anything finer with nine; no fraction when it is zero.
fn format_iso(dt: NaiveDateTime) -> String {
    let nanos = dt.nanosecond();
    let fraction = if nanos == 0 {
        ""
    } else if nanos % 1_000 == 0 {
        "%.6f"
    } else {
        "%.9f"
    };
    dt.format(&format!("{}{}", ISO_FORMAT, fraction)).to_string()
}

/// Parse an ISO-8601 date-time, a date-time with offset, or a bare date.
fn parse_iso_datetime(value: &str) -> EventResult<NaiveDateTime> {
    if let Ok(dt) = value.parse::<NaiveDateTime>() {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    value
        .parse::<NaiveDate>()
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| EventError::MalformedDate(value.to_string()))
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = match self.resolved_date {
            Some(dt) => format_iso(dt),
            None => INVALID_DATE.to_string(),
        };
        write!(f, "Name: {}\nRaw: {}\nFormatted: {}", self.event_name.trim(), self.event_date, formatted)
    }
}
