//! Google Calendar access.
//!
//! [`CalendarService`] is the seam the calendar commands talk to;
//! [`GoogleCalendarClient`] implements it over the Calendar API v3.

mod client;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::BoxFuture;
use crate::error::{ProviderError, ProviderResult};
use crate::target::TargetResource;

pub use client::GoogleCalendarClient;

/// Time zone attached to created events unless configured otherwise.
pub const DEFAULT_TIMEZONE: &str = "Europe/Madrid";

/// Number of upcoming events listed by default.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// A calendar from the calendar list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    /// The calendar ID.
    pub id: String,
    /// The calendar summary (name).
    #[serde(default)]
    pub summary: String,
    /// Whether this is the primary calendar of the authenticated identity.
    #[serde(default)]
    pub primary: bool,
    /// The calendar timezone.
    pub time_zone: Option<String>,
}

impl From<&CalendarListEntry> for TargetResource {
    fn from(entry: &CalendarListEntry) -> Self {
        TargetResource::new(&entry.id, &entry.summary)
    }
}

/// Start or end of an event as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// Date for all-day events (`YYYY-MM-DD`).
    pub date: Option<String>,
    /// Timestamp for timed events (RFC 3339).
    pub date_time: Option<String>,
    /// Time zone of the timestamp, if given.
    pub time_zone: Option<String>,
}

impl EventTime {
    /// Returns the timestamp, falling back to the all-day date.
    pub fn display(&self) -> &str {
        self.date_time
            .as_deref()
            .or(self.date.as_deref())
            .unwrap_or("?")
    }
}

/// An upcoming event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Event identifier.
    pub id: Option<String>,
    /// Event title.
    pub summary: Option<String>,
    /// Event start.
    #[serde(default)]
    pub start: EventTime,
    /// Link to the event in the calendar web UI.
    pub html_link: Option<String>,
}

impl CalendarEvent {
    /// Returns the title, or a placeholder for untitled events.
    pub fn title(&self) -> &str {
        self.summary.as_deref().unwrap_or("(no title)")
    }
}

/// Local date-time plus time zone name, as sent to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// Naive local timestamp (`YYYY-MM-DDTHH:MM:SS`).
    pub date_time: String,
    /// IANA time zone the timestamp is expressed in.
    pub time_zone: String,
}

/// Payload for creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEvent {
    /// Event title.
    pub summary: String,
    /// Event start.
    pub start: EventDateTime,
    /// Event end.
    pub end: EventDateTime,
}

impl NewEvent {
    /// Builds a timed event from command-line style inputs.
    ///
    /// `date` is `YYYY-MM-DD`, `time` is `HH:MM`, `duration_minutes` is an
    /// integer. The start is interpreted in `timezone`; the end is the start
    /// plus the duration.
    pub fn from_local(
        date: &str,
        time: &str,
        duration_minutes: &str,
        title: impl Into<String>,
        timezone: &str,
    ) -> ProviderResult<Self> {
        let raw_start = format!("{}T{}:00", date, time);
        let start = NaiveDateTime::parse_from_str(&raw_start, "%Y-%m-%dT%H:%M:%S")
            .map_err(|e| {
                ProviderError::bad_request(format!("invalid start '{}': {}", raw_start, e))
            })?;

        let minutes: i64 = duration_minutes.trim().parse().map_err(|e| {
            ProviderError::bad_request(format!("invalid duration '{}': {}", duration_minutes, e))
        })?;

        let end = chrono::Duration::try_minutes(minutes)
            .and_then(|d| start.checked_add_signed(d))
            .ok_or_else(|| {
                ProviderError::bad_request(format!("duration out of range: {}", minutes))
            })?;

        Ok(Self {
            summary: title.into(),
            start: EventDateTime::new(start, timezone),
            end: EventDateTime::new(end, timezone),
        })
    }
}

impl EventDateTime {
    fn new(at: NaiveDateTime, timezone: &str) -> Self {
        Self {
            date_time: at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            time_zone: timezone.to_string(),
        }
    }
}

/// An event returned by the insert call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    /// Event identifier.
    pub id: Option<String>,
    /// Link to the event in the calendar web UI.
    pub html_link: Option<String>,
}

/// Calendar operations used by the calendar commands.
pub trait CalendarService: Send + Sync {
    /// Lists calendars visible to the authenticated identity.
    fn list_calendars(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarListEntry>>>;

    /// Lists upcoming events starting at or after `time_min`, recurring
    /// events expanded into instances, ordered by start time.
    fn list_upcoming<'a>(
        &'a self,
        calendar_id: &'a str,
        time_min: DateTime<Utc>,
        max_results: usize,
    ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>>;

    /// Inserts an event into a calendar.
    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a NewEvent,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>>;
}
