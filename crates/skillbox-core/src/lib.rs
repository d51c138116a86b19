//! Shared pieces for the skillbox tools: tracing setup, slugs, output formatting

pub mod format;
pub mod slug;
pub mod tracing;

pub use format::{event_line, file_icon, file_line, file_line_with_date, short_date};
pub use slug::slugify;
pub use tracing::{init_tracing, TracingConfig, TracingError};
