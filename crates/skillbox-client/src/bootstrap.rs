//! Start-up steps shared by the binaries.

use skillbox_core::{TracingConfig, init_tracing};
use skillbox_providers::auth::service_account_token;
use skillbox_providers::{CredentialResolver, CredentialSource, CredentialSources};
use tracing::{debug, info};

use crate::cli::GlobalArgs;
use crate::config::ToolConfig;
use crate::error::ClientResult;

/// Sets up logging on stderr; `--debug` turns on debug output with locations.
pub fn setup_tracing(global: &GlobalArgs) {
    let config = if global.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(config) {
        eprintln!("warning: {}", e);
    }
}

/// Loads the configuration named by the global flags.
pub fn load_config(global: &GlobalArgs) -> ClientResult<ToolConfig> {
    let config = ToolConfig::resolve(global.config.as_deref())?;
    debug!(?config, "loaded configuration");
    Ok(config)
}

/// Resolves the service account key and fetches a token for `scopes`.
pub async fn access_token(config: &ToolConfig, scopes: &[&str]) -> ClientResult<String> {
    let resolver = CredentialResolver::new(config.credentials.clone());
    let sources = CredentialSources::from_env(resolver.config());
    let credential = resolver.resolve(&sources)?;

    match credential.source {
        CredentialSource::File => debug!("credential file {}", credential.path.display()),
        CredentialSource::Materialized { written } => info!(
            written,
            "credential materialized at {}",
            credential.path.display()
        ),
    }

    Ok(service_account_token(&credential.path, scopes).await?)
}
