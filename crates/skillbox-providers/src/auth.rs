//! Access tokens for a service account.
//!
//! The JWT grant itself is handled by `yup-oauth2`; this module only loads
//! the key file produced by [`crate::credentials`] and asks for a token with
//! the scopes a tool needs.

use std::path::Path;

use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// Full read/write access to calendars.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Full read/write access to Drive files.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Fetches an OAuth access token for the service account key at `key_path`.
pub async fn service_account_token(key_path: &Path, scopes: &[&str]) -> ProviderResult<String> {
    let key = yup_oauth2::read_service_account_key(key_path)
        .await
        .map_err(|e| {
            ProviderError::configuration(format!(
                "failed to read service account key {}: {}",
                key_path.display(),
                e
            ))
            .with_source(e)
        })?;

    debug!(client_email = %key.client_email, "building service account authenticator");

    let authenticator = yup_oauth2::ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| {
            ProviderError::authentication(format!("failed to build authenticator: {}", e))
                .with_source(e)
        })?;

    let token = authenticator
        .token(scopes)
        .await
        .map_err(|e| ProviderError::authentication(format!("token request failed: {}", e)))?;

    token
        .token()
        .map(str::to_string)
        .ok_or_else(|| ProviderError::authentication("token response carried no access token"))
}
