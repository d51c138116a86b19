//! A knowledge note and its on-disk form.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use skillbox_core::slugify;
use tracing::info;

use crate::error::{KnowledgeError, KnowledgeResult};

/// A titled markdown note stamped with its creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeEntry {
    title: String,
    content: String,
    created: NaiveDateTime,
}

impl KnowledgeEntry {
    /// Creates a note stamped with the current local time.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::at(title, content, Local::now().naive_local())
    }

    /// Creates a note stamped with `created`.
    pub fn at(title: impl Into<String>, content: impl Into<String>, created: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            created,
        }
    }

    /// Returns the note title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// `{YYYY-MM-DD}_{slug}.md`
    pub fn filename(&self) -> String {
        format!(
            "{}_{}.md",
            self.created.format("%Y-%m-%d"),
            slugify(&self.title)
        )
    }

    /// Renders the file body: heading, timestamp line, blank line, content.
    pub fn body(&self) -> String {
        format!(
            "# {}\nDate: {}\n\n{}\n",
            self.title,
            self.created.format("%Y-%m-%dT%H:%M:%S%.6f"),
            self.content
        )
    }

    /// Writes the note into `dir`, replacing any same-named file, and
    /// returns the written path.
    pub fn write_to(&self, dir: &Path) -> KnowledgeResult<PathBuf> {
        let path = dir.join(self.filename());
        fs::write(&path, self.body()).map_err(|source| KnowledgeError::Write {
            path: path.clone(),
            source,
        })?;
        info!("wrote {}", path.display());
        Ok(path)
    }
}
