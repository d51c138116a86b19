//! Tool configuration.
//!
//! All settings live in a single optional `config.toml` file at
//! `~/.config/skillbox/config.toml` by default. Every section and key has a
//! default, so an empty or missing file behaves like the built-in settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use skillbox_knowledge::{DEFAULT_BRANCH, DEFAULT_FALLBACK_ROOT, DEFAULT_REPO_URL, expand_home};
use skillbox_providers::calendar::{DEFAULT_MAX_RESULTS, DEFAULT_TIMEZONE};
use skillbox_providers::drive::{DEFAULT_FOLDER, DEFAULT_LIST_PAGE_SIZE};
use skillbox_providers::{CredentialConfig, DEFAULT_TIMEOUT_SECS};

use crate::error::{ClientError, ClientResult};

/// Configuration shared by the three tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Where the service account key comes from.
    pub credentials: CredentialConfig,

    /// Calendar settings.
    pub calendar: CalendarSettings,

    /// Drive settings.
    pub drive: DriveSettings,

    /// Knowledge saver settings.
    pub knowledge: KnowledgeSettings,

    /// HTTP settings.
    pub http: HttpSettings,
}

/// Calendar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Time zone new events are created in.
    pub timezone: String,

    /// Number of upcoming events `list` shows.
    pub max_results: usize,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Drive settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveSettings {
    /// Folder uploads and created files go to.
    pub default_folder: String,

    /// Number of files `list` shows when no size is given.
    pub list_page_size: u32,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            default_folder: DEFAULT_FOLDER.to_string(),
            list_page_size: DEFAULT_LIST_PAGE_SIZE,
        }
    }
}

/// Knowledge saver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeSettings {
    /// Web URL of the notes repository.
    pub repo_url: String,

    /// Branch notes are browsed on.
    pub branch: String,

    /// Repository root used outside a git checkout. `~` is expanded.
    pub fallback_root: String,
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            repo_url: DEFAULT_REPO_URL.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            fallback_root: DEFAULT_FALLBACK_ROOT.to_string(),
        }
    }
}

impl KnowledgeSettings {
    /// Returns the fallback root with `~` expanded.
    pub fn fallback_root(&self) -> PathBuf {
        expand_home(&self.fallback_root)
    }
}

/// HTTP settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HttpSettings {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ToolConfig {
    /// Loads `explicit` if given, otherwise the default file if it exists.
    ///
    /// An explicit path must exist and parse; a missing default file yields
    /// the defaults.
    pub fn resolve(explicit: Option<&Path>) -> ClientResult<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Loads configuration from the default path.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| ClientError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skillbox")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ToolConfig::parse("").unwrap();
        assert_eq!(config, ToolConfig::default());
        assert_eq!(config.calendar.timezone, "Europe/Madrid");
        assert_eq!(config.calendar.max_results, 10);
        assert_eq!(config.drive.default_folder, "Cerebro_Proyecto_Gemini");
        assert_eq!(config.drive.list_page_size, 30);
        assert_eq!(config.knowledge.branch, "main");
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert_eq!(
            config.credentials.materialize_path,
            PathBuf::from("/tmp/gsa_credentials.json")
        );
    }

    #[test]
    fn full_file() {
        let toml = r#"
            [credentials]
            path_var = "MY_KEY_PATH"
            content_var = "MY_KEY_JSON"
            materialize_path = "/run/user/1000/key.json"

            [calendar]
            timezone = "America/New_York"
            max_results = 5

            [drive]
            default_folder = "Inbox"
            list_page_size = 50

            [knowledge]
            repo_url = "https://git.example.com/me/notes"
            branch = "trunk"
            fallback_root = "/srv/notes"

            [http]
            timeout_secs = 10
        "#;

        let config = ToolConfig::parse(toml).unwrap();
        assert_eq!(config.credentials.path_var, "MY_KEY_PATH");
        assert_eq!(config.credentials.content_var, "MY_KEY_JSON");
        assert_eq!(config.calendar.timezone, "America/New_York");
        assert_eq!(config.calendar.max_results, 5);
        assert_eq!(config.drive.default_folder, "Inbox");
        assert_eq!(config.drive.list_page_size, 50);
        assert_eq!(config.knowledge.repo_url, "https://git.example.com/me/notes");
        assert_eq!(config.knowledge.branch, "trunk");
        assert_eq!(config.knowledge.fallback_root(), PathBuf::from("/srv/notes"));
        assert_eq!(config.http.timeout_secs, 10);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = ToolConfig::parse("[drive]\ndefault_folder = \"Work\"\n").unwrap();
        assert_eq!(config.drive.default_folder, "Work");
        assert_eq!(config.drive.list_page_size, 30);
        assert_eq!(config.calendar, CalendarSettings::default());
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(ToolConfig::parse("[calendar\nmax_results = ").is_err());
        assert!(ToolConfig::parse("[calendar]\nmax_results = \"ten\"").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = 3\n").unwrap();

        let config = ToolConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.http.timeout_secs, 3);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ToolConfig::resolve(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn serialized_defaults_round_trip() {
        let text = toml::to_string_pretty(&ToolConfig::default()).unwrap();
        assert_eq!(ToolConfig::parse(&text).unwrap(), ToolConfig::default());
    }
}
