//! Google Calendar API client.
//!
//! A thin HTTP client for the three Calendar API v3 calls the tools make.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::BoxFuture;
use crate::error::{ProviderError, ProviderResult};
use crate::http::{build_client, check_status, read_json};

use super::{CalendarEvent, CalendarListEntry, CalendarService, CreatedEvent, NewEvent};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Creates a new Google Calendar client with the given access token.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            http_client: build_client(timeout)?,
            access_token: access_token.into(),
            base_url: CALENDAR_API_BASE.to_string(),
        })
    }

    /// Points the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    async fn fetch_calendars(&self) -> ProviderResult<Vec<CalendarListEntry>> {
        let url = format!("{}/users/me/calendarList", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let list: CalendarListResponse = read_json(check_status(response).await?).await?;
        debug!("calendar list returned {} entries", list.items.len());
        Ok(list.items)
    }

    async fn fetch_upcoming(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: usize,
    ) -> ProviderResult<Vec<CalendarEvent>> {
        let response = self
            .http_client
            .get(self.events_url(calendar_id))
            .bearer_auth(&self.access_token)
            .query(&[
                (
                    "timeMin",
                    time_min.to_rfc3339_opts(SecondsFormat::Micros, true),
                ),
                ("maxResults", max_results.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await?;

        let list: EventListResponse = read_json(check_status(response).await?).await?;
        debug!(
            "fetched {} events from calendar {}",
            list.items.len(),
            calendar_id
        );
        Ok(list.items)
    }

    async fn create_event(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> ProviderResult<CreatedEvent> {
        let response = self
            .http_client
            .post(self.events_url(calendar_id))
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await?;

        let created: CreatedEvent = read_json(check_status(response).await?).await?;
        debug!(id = ?created.id, "created event in calendar {}", calendar_id);
        Ok(created)
    }
}

impl CalendarService for GoogleCalendarClient {
    fn list_calendars(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarListEntry>>> {
        Box::pin(async move { self.fetch_calendars().await.map_err(calendar_error) })
    }

    fn list_upcoming<'a>(
        &'a self,
        calendar_id: &'a str,
        time_min: DateTime<Utc>,
        max_results: usize,
    ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>> {
        Box::pin(async move {
            self.fetch_upcoming(calendar_id, time_min, max_results)
                .await
                .map_err(calendar_error)
        })
    }

    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a NewEvent,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>> {
        Box::pin(async move {
            self.create_event(calendar_id, event)
                .await
                .map_err(calendar_error)
        })
    }
}

/// Tags an error with the service it came from.
fn calendar_error(err: ProviderError) -> ProviderError {
    err.with_provider("calendar")
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

/// Response from the calendarList endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarListResponse {
    #[serde(default)]
    items: Vec<CalendarListEntry>,
}
