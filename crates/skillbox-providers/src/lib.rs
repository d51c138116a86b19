//! Credential resolution and Google Calendar / Drive clients.
//!
//! - [`credentials`] - Locates (or materializes) the service account key
//! - [`auth`] - Exchanges the key for a scoped access token
//! - [`target`] - Picks the user-owned calendar or folder shared with the account
//! - [`calendar`] - [`CalendarService`] and its Google implementation
//! - [`drive`] - [`DriveService`], its Google implementation, lookup and content reading
//!
//! # Example
//!
//! ```ignore
//! use skillbox_providers::{CalendarService, GoogleCalendarClient, auth};
//!
//! let token = auth::service_account_token(&key_path, &[auth::CALENDAR_SCOPE]).await?;
//! let client = GoogleCalendarClient::new(token, timeout)?;
//! let calendars = client.list_calendars().await?;
//! ```

use std::future::Future;
use std::pin::Pin;

pub mod auth;
pub mod calendar;
pub mod credentials;
pub mod drive;
pub mod error;
mod http;
pub mod target;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// A boxed future, keeping the service traits object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub use calendar::{CalendarService, GoogleCalendarClient, NewEvent};
pub use credentials::{
    CredentialConfig, CredentialError, CredentialResolver, CredentialSource, CredentialSources,
    ResolvedCredential,
};
pub use drive::{DriveFile, DriveService, FileQuery, GoogleDriveClient, NewFile};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use http::DEFAULT_TIMEOUT_SECS;
pub use target::{TargetResource, select_target};
