//! Google Drive access.
//!
//! [`DriveService`] is the seam the storage commands talk to;
//! [`GoogleDriveClient`] implements it over the Drive API v3. Lookup and
//! MIME branching live in [`content`], query construction in [`query`].

mod client;
pub mod content;
pub mod query;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::BoxFuture;
use crate::error::ProviderResult;

pub use client::GoogleDriveClient;
pub use content::{ContentKind, FileContent, FileLookup, lookup_file, read_content};

/// MIME type Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Field selector for listings that show dates.
pub const LIST_FIELDS: &str = "files(id, name, mimeType, modifiedTime)";

/// Field selector for lookups.
pub const LOOKUP_FIELDS: &str = "files(id, name, mimeType)";

/// Ordering for listings: most recently modified first.
pub const ORDER_RECENT_FIRST: &str = "modifiedTime desc";

/// Folder that uploads and created files land in unless told otherwise.
pub const DEFAULT_FOLDER: &str = "Cerebro_Proyecto_Gemini";

/// Default page size for `list`.
pub const DEFAULT_LIST_PAGE_SIZE: u32 = 30;

/// Page size for `search`.
pub const SEARCH_PAGE_SIZE: u32 = 20;

/// Page size for the by-name stage of `read`.
pub const LOOKUP_PAGE_SIZE: u32 = 5;

/// A file (or folder) in Drive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File identifier.
    pub id: String,
    /// File name.
    #[serde(default)]
    pub name: String,
    /// MIME type.
    #[serde(default)]
    pub mime_type: String,
    /// Last modification time (RFC 3339), when requested.
    pub modified_time: Option<String>,
}

impl DriveFile {
    /// Creates a file record.
    pub fn new(id: impl Into<String>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            modified_time: None,
        }
    }

    /// Builder method to set the modification time.
    pub fn with_modified_time(mut self, modified: impl Into<String>) -> Self {
        self.modified_time = Some(modified.into());
        self
    }

    /// Returns true if this is a folder.
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }
}

/// Parameters for `files.list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuery {
    /// Search expression in the Drive query language.
    pub q: Option<String>,
    /// Maximum number of files to return.
    pub page_size: Option<u32>,
    /// Sort order.
    pub order_by: Option<String>,
    /// Partial response field selector.
    pub fields: String,
}

impl Default for FileQuery {
    fn default() -> Self {
        Self {
            q: None,
            page_size: None,
            order_by: None,
            fields: LIST_FIELDS.to_string(),
        }
    }
}

impl FileQuery {
    /// Creates an unfiltered query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the search expression.
    pub fn with_q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    /// Builder method to set the page size.
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Builder method to set the sort order.
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Builder method to set the field selector.
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }
}

/// Metadata for a file being created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    /// File name.
    pub name: String,
    /// Parent folder ids; empty means the Drive root.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    /// MIME type to store the file as.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl NewFile {
    /// Creates metadata for a file in the Drive root.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Places the file in `folder_id`, or in the root when `None`.
    pub fn in_folder(mut self, folder_id: Option<String>) -> Self {
        self.parents = folder_id.into_iter().collect();
        self
    }

    /// Builder method to set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Drive operations used by the storage commands.
pub trait DriveService: Send + Sync {
    /// Lists files matching a query.
    fn list_files<'a>(&'a self, query: &'a FileQuery) -> BoxFuture<'a, ProviderResult<Vec<DriveFile>>>;

    /// Fetches metadata for one file by id.
    fn get_file<'a>(&'a self, file_id: &'a str) -> BoxFuture<'a, ProviderResult<DriveFile>>;

    /// Exports a native Google document as plain text.
    fn export_text<'a>(&'a self, file_id: &'a str) -> BoxFuture<'a, ProviderResult<String>>;

    /// Downloads the raw bytes of a stored file.
    fn download<'a>(&'a self, file_id: &'a str) -> BoxFuture<'a, ProviderResult<Vec<u8>>>;

    /// Uploads a local file.
    fn upload_file<'a>(
        &'a self,
        metadata: &'a NewFile,
        path: &'a Path,
    ) -> BoxFuture<'a, ProviderResult<DriveFile>>;

    /// Creates a plain-text file from in-memory content.
    fn create_text_file<'a>(
        &'a self,
        metadata: &'a NewFile,
        content: &'a str,
    ) -> BoxFuture<'a, ProviderResult<DriveFile>>;
}

/// Returns the id of the first folder named exactly `name`.
pub async fn find_folder(service: &dyn DriveService, name: &str) -> ProviderResult<Option<String>> {
    let query = FileQuery::new()
        .with_q(query::folder_named(name))
        .with_fields("files(id, name)");
    let folders = service.list_files(&query).await?;
    Ok(folders.into_iter().next().map(|f| f.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drive_file() {
        let file: DriveFile = serde_json::from_str(
            r#"{"id": "1", "name": "Notes", "mimeType": "text/plain", "modifiedTime": "2024-03-15T10:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(file.name, "Notes");
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.modified_time.as_deref(), Some("2024-03-15T10:00:00.000Z"));
        assert!(!file.is_folder());
    }

    #[test]
    fn parse_partial_drive_file() {
        let file: DriveFile = serde_json::from_str(r#"{"id": "1"}"#).unwrap();
        assert!(file.name.is_empty());
        assert!(file.mime_type.is_empty());
    }

    #[test]
    fn new_file_metadata_omits_empty_parents() {
        let root = serde_json::to_value(NewFile::new("a.txt").in_folder(None)).unwrap();
        assert_eq!(root, serde_json::json!({"name": "a.txt"}));

        let nested = serde_json::to_value(
            NewFile::new("a.txt")
                .in_folder(Some("folder-1".into()))
                .with_mime_type("text/plain"),
        )
        .unwrap();
        assert_eq!(
            nested,
            serde_json::json!({"name": "a.txt", "parents": ["folder-1"], "mimeType": "text/plain"})
        );
    }

    #[test]
    fn file_query_builder() {
        let query = FileQuery::new()
            .with_q("name contains 'x'")
            .with_page_size(20)
            .with_order_by(ORDER_RECENT_FIRST);
        assert_eq!(query.q.as_deref(), Some("name contains 'x'"));
        assert_eq!(query.page_size, Some(20));
        assert_eq!(query.fields, LIST_FIELDS);
    }
}
