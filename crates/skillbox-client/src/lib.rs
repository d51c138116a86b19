//! Command-line tools for Google Calendar, Google Drive and knowledge notes.
//!
//! Three binaries share this crate: `calendar-tool`, `drive-tool` and
//! `save-knowledge`. Each parses its [`cli`] definition, loads the optional
//! [`config`] file, and hands off to one handler in [`commands`].

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use config::ToolConfig;
pub use error::{ClientError, ClientResult};
