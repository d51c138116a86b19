//! In-memory service fakes for tests.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for downstream crates' tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::BoxFuture;
use crate::calendar::{
    CalendarEvent, CalendarListEntry, CalendarService, CreatedEvent, EventTime, NewEvent,
};
use crate::drive::{DriveFile, DriveService, FOLDER_MIME_TYPE, FileQuery, NewFile};
use crate::error::{ProviderError, ProviderErrorCode, ProviderResult};

/// A call made against [`FakeDrive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveCall {
    /// `list_files`
    List(FileQuery),
    /// `get_file`
    Get(String),
    /// `export_text`
    Export(String),
    /// `download`
    Download(String),
    /// `upload_file`
    Upload(NewFile, PathBuf),
    /// `create_text_file`
    Create(NewFile, String),
}

/// A scripted [`DriveService`].
///
/// `list_files` filters the configured files the way Drive would for the
/// two query shapes the tools build (name-contains and folder-by-name).
#[derive(Debug, Default)]
pub struct FakeDrive {
    files: Vec<DriveFile>,
    by_id: Option<DriveFile>,
    get_error: Option<ProviderErrorCode>,
    list_error: Option<ProviderErrorCode>,
    export: Option<String>,
    download: Option<Vec<u8>>,
    calls: Mutex<Vec<DriveCall>>,
}

impl FakeDrive {
    /// Creates an empty fake.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files returned by `list_files`.
    pub fn with_files(mut self, files: Vec<DriveFile>) -> Self {
        self.files = files;
        self
    }

    /// File returned by `get_file` for its own id.
    pub fn with_file_by_id(mut self, file: DriveFile) -> Self {
        self.by_id = Some(file);
        self
    }

    /// Error returned by `get_file` for unknown ids (default: not found).
    pub fn with_get_error(mut self, code: ProviderErrorCode) -> Self {
        self.get_error = Some(code);
        self
    }

    /// Error returned by every `list_files` call.
    pub fn with_list_error(mut self, code: ProviderErrorCode) -> Self {
        self.list_error = Some(code);
        self
    }

    /// Text returned by `export_text`.
    pub fn with_export(mut self, text: impl Into<String>) -> Self {
        self.export = Some(text.into());
        self
    }

    /// Bytes returned by `download`.
    pub fn with_download(mut self, bytes: Vec<u8>) -> Self {
        self.download = Some(bytes);
        self
    }

    /// Returns the calls made so far, in order.
    pub fn calls(&self) -> Vec<DriveCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: DriveCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn matching(&self, query: &FileQuery) -> Vec<DriveFile> {
        let mut files: Vec<DriveFile> = match query.q.as_deref() {
            None => self.files.clone(),
            Some(q) => {
                let literal = first_literal(q);
                if q.contains(FOLDER_MIME_TYPE) {
                    self.files
                        .iter()
                        .filter(|f| f.is_folder() && f.name == literal)
                        .cloned()
                        .collect()
                } else {
                    self.files
                        .iter()
                        .filter(|f| f.name.contains(&literal))
                        .cloned()
                        .collect()
                }
            }
        };
        if let Some(size) = query.page_size {
            files.truncate(size as usize);
        }
        files
    }

    fn created(metadata: &NewFile) -> DriveFile {
        DriveFile::new(
            format!("new-{}", metadata.name),
            &metadata.name,
            metadata.mime_type.clone().unwrap_or_default(),
        )
    }
}

/// Extracts and unescapes the first single-quoted literal of a query.
fn first_literal(q: &str) -> String {
    let mut chars = q.chars().skip_while(|c| *c != '\'').skip(1);
    let mut literal = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    literal.push(next);
                }
            }
            '\'' => break,
            other => literal.push(other),
        }
    }
    literal
}

fn scripted_error(code: ProviderErrorCode, what: &str) -> ProviderError {
    ProviderError::new(code, format!("scripted failure: {}", what))
}

impl DriveService for FakeDrive {
    fn list_files<'a>(&'a self, query: &'a FileQuery) -> BoxFuture<'a, ProviderResult<Vec<DriveFile>>> {
        self.record(DriveCall::List(query.clone()));
        let result = match self.list_error {
            Some(code) => Err(scripted_error(code, "list")),
            None => Ok(self.matching(query)),
        };
        Box::pin(async move { result })
    }

    fn get_file<'a>(&'a self, file_id: &'a str) -> BoxFuture<'a, ProviderResult<DriveFile>> {
        self.record(DriveCall::Get(file_id.to_string()));
        let result = match &self.by_id {
            Some(file) if file.id == file_id => Ok(file.clone()),
            _ => Err(scripted_error(
                self.get_error.unwrap_or(ProviderErrorCode::NotFound),
                file_id,
            )),
        };
        Box::pin(async move { result })
    }

    fn export_text<'a>(&'a self, file_id: &'a str) -> BoxFuture<'a, ProviderResult<String>> {
        self.record(DriveCall::Export(file_id.to_string()));
        let result = self
            .export
            .clone()
            .ok_or_else(|| scripted_error(ProviderErrorCode::ServerError, "export"));
        Box::pin(async move { result })
    }

    fn download<'a>(&'a self, file_id: &'a str) -> BoxFuture<'a, ProviderResult<Vec<u8>>> {
        self.record(DriveCall::Download(file_id.to_string()));
        let result = self
            .download
            .clone()
            .ok_or_else(|| scripted_error(ProviderErrorCode::ServerError, "download"));
        Box::pin(async move { result })
    }

    fn upload_file<'a>(
        &'a self,
        metadata: &'a NewFile,
        path: &'a Path,
    ) -> BoxFuture<'a, ProviderResult<DriveFile>> {
        self.record(DriveCall::Upload(metadata.clone(), path.to_path_buf()));
        let file = Self::created(metadata);
        Box::pin(async move { Ok(file) })
    }

    fn create_text_file<'a>(
        &'a self,
        metadata: &'a NewFile,
        content: &'a str,
    ) -> BoxFuture<'a, ProviderResult<DriveFile>> {
        self.record(DriveCall::Create(metadata.clone(), content.to_string()));
        let file = Self::created(metadata);
        Box::pin(async move { Ok(file) })
    }
}

/// A call made against [`FakeCalendar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCall {
    /// `list_calendars`
    ListCalendars,
    /// `list_upcoming`
    ListUpcoming {
        /// Calendar queried.
        calendar_id: String,
        /// Requested cap.
        max_results: usize,
    },
    /// `insert_event`
    Insert {
        /// Calendar written to.
        calendar_id: String,
        /// Submitted payload.
        event: NewEvent,
    },
}

/// A scripted [`CalendarService`].
#[derive(Debug, Default)]
pub struct FakeCalendar {
    calendars: Vec<CalendarListEntry>,
    events: Vec<CalendarEvent>,
    insert_error: Option<ProviderErrorCode>,
    calls: Mutex<Vec<CalendarCall>>,
}

impl FakeCalendar {
    /// Creates a fake with no calendars.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a calendar to the calendar list.
    pub fn with_calendar(mut self, id: &str) -> Self {
        self.calendars.push(CalendarListEntry {
            id: id.to_string(),
            summary: id.to_string(),
            primary: false,
            time_zone: None,
        });
        self
    }

    /// Adds an upcoming event.
    pub fn with_event(mut self, summary: &str, start: &str) -> Self {
        self.events.push(CalendarEvent {
            id: Some(format!("ev-{}", self.events.len())),
            summary: Some(summary.to_string()),
            start: EventTime {
                date_time: Some(start.to_string()),
                ..EventTime::default()
            },
            html_link: None,
        });
        self
    }

    /// Makes `insert_event` fail.
    pub fn with_insert_error(mut self, code: ProviderErrorCode) -> Self {
        self.insert_error = Some(code);
        self
    }

    /// Returns the calls made so far, in order.
    pub fn calls(&self) -> Vec<CalendarCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: CalendarCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl CalendarService for FakeCalendar {
    fn list_calendars(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarListEntry>>> {
        self.record(CalendarCall::ListCalendars);
        let calendars = self.calendars.clone();
        Box::pin(async move { Ok(calendars) })
    }

    fn list_upcoming<'a>(
        &'a self,
        calendar_id: &'a str,
        _time_min: DateTime<Utc>,
        max_results: usize,
    ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>> {
        self.record(CalendarCall::ListUpcoming {
            calendar_id: calendar_id.to_string(),
            max_results,
        });
        let events: Vec<CalendarEvent> = self.events.iter().take(max_results).cloned().collect();
        Box::pin(async move { Ok(events) })
    }

    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a NewEvent,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>> {
        self.record(CalendarCall::Insert {
            calendar_id: calendar_id.to_string(),
            event: event.clone(),
        });
        let result = match self.insert_error {
            Some(code) => Err(scripted_error(code, "insert")),
            None => Ok(CreatedEvent {
                id: Some("created-1".to_string()),
                html_link: Some("https://calendar.example/event?eid=created-1".to_string()),
            }),
        };
        Box::pin(async move { result })
    }
}
