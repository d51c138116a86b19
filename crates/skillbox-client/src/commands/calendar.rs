//! Calendar commands.

use std::io::{self, Write};

use chrono::Utc;
use skillbox_core::event_line;
use skillbox_providers::calendar::CalendarService;
use skillbox_providers::{NewEvent, ProviderResult, TargetResource, select_target};
use tracing::debug;

use crate::config::CalendarSettings;

/// Printed when the tool runs without a command.
pub const BANNER: &str = "Google Calendar Tool
Commands: list, create
Usage: calendar-tool <command> [args]";

const CREATE_USAGE: &str = r#"Usage: create "YYYY-MM-DD" "HH:MM" "Duration(mins)" "Title""#;

/// Prints the banner.
pub fn banner(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", BANNER)
}

/// Returns the first user-owned calendar shared with the service account.
pub async fn target_calendar(service: &dyn CalendarService) -> ProviderResult<Option<String>> {
    let calendars = service.list_calendars().await?;
    let resources: Vec<TargetResource> = calendars.iter().map(TargetResource::from).collect();
    let target = select_target(&resources).map(str::to_string);
    debug!(candidates = resources.len(), ?target, "selected calendar");
    Ok(target)
}

/// `list`: upcoming events of the shared calendar.
pub async fn list(
    service: &dyn CalendarService,
    settings: &CalendarSettings,
    out: &mut dyn Write,
) -> io::Result<()> {
    let calendar_id = match target_calendar(service).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            return writeln!(
                out,
                "ERROR: No shared user calendar found. Did you share your calendar with the Service Account?"
            );
        }
        Err(e) => return writeln!(out, "Error reading calendar: {}", e),
    };

    writeln!(out, "📅 Reading calendar: {}\n", calendar_id)?;

    let events = match service
        .list_upcoming(&calendar_id, Utc::now(), settings.max_results)
        .await
    {
        Ok(events) => events,
        Err(e) => return writeln!(out, "Error reading calendar: {}", e),
    };

    if events.is_empty() {
        return writeln!(out, "No upcoming events found.");
    }

    for event in &events {
        writeln!(out, "{}", event_line(event.start.display(), event.title()))?;
    }
    Ok(())
}

/// `create <date> <time> <duration> <title>`: adds a timed event.
pub async fn create(
    service: &dyn CalendarService,
    args: &[String],
    settings: &CalendarSettings,
    out: &mut dyn Write,
) -> io::Result<()> {
    let [date, time, duration, title, ..] = args else {
        return writeln!(out, "{}", CREATE_USAGE);
    };

    let calendar_id = match target_calendar(service).await {
        Ok(Some(id)) => id,
        Ok(None) => return writeln!(out, "ERROR: No shared user calendar found."),
        Err(e) => return writeln!(out, "Error creating event: {}", e),
    };

    let event = match NewEvent::from_local(date, time, duration, title, &settings.timezone) {
        Ok(event) => event,
        Err(e) => return writeln!(out, "Error creating event: {}", e),
    };

    match service.insert_event(&calendar_id, &event).await {
        Ok(created) => writeln!(
            out,
            "✅ Event created: {}",
            created.html_link.as_deref().unwrap_or("(no link)")
        ),
        Err(e) => writeln!(out, "Error creating event: {}", e),
    }
}
