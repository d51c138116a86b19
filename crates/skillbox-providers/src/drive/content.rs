//! Finding a file by name or id and reading its content.

use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

use super::{DriveFile, DriveService, FileQuery, LOOKUP_FIELDS, LOOKUP_PAGE_SIZE, query};

/// MIME fragment identifying native Google documents.
const GOOGLE_DOCUMENT_MARKER: &str = "google-apps.document";

/// MIME fragments of formats that can be shown as text.
const TEXT_MARKERS: [&str; 5] = ["text", "markdown", "json", "xml", "yaml"];

/// How a file's content can be retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Native Google document, exported as plain text.
    GoogleDocument,
    /// Stored text-like file, downloaded and decoded as UTF-8.
    Text,
    /// Anything else; never downloaded.
    Binary,
}

impl ContentKind {
    /// Classifies a MIME type.
    pub fn classify(mime_type: &str) -> Self {
        if mime_type.contains(GOOGLE_DOCUMENT_MARKER) {
            Self::GoogleDocument
        } else if TEXT_MARKERS.iter().any(|m| mime_type.contains(m)) {
            Self::Text
        } else {
            Self::Binary
        }
    }
}

/// Outcome of resolving a name-or-id argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLookup {
    /// A file whose name contains the argument.
    FoundByName(DriveFile),
    /// A file whose id is the argument.
    FoundById(DriveFile),
    /// Neither stage matched.
    NotFound,
}

impl FileLookup {
    /// Returns the file, if one was found.
    pub fn file(&self) -> Option<&DriveFile> {
        match self {
            Self::FoundByName(file) | Self::FoundById(file) => Some(file),
            Self::NotFound => None,
        }
    }

    /// Consumes the lookup, returning the file if one was found.
    pub fn into_file(self) -> Option<DriveFile> {
        match self {
            Self::FoundByName(file) | Self::FoundById(file) => Some(file),
            Self::NotFound => None,
        }
    }
}

/// Resolves `name_or_id` in two stages: a name-contains search (first hit
/// wins), then a direct fetch treating the argument as an id.
///
/// A not-found or malformed-id answer from the direct fetch yields
/// [`FileLookup::NotFound`]; any other failure is returned as an error.
pub async fn lookup_file(service: &dyn DriveService, name_or_id: &str) -> ProviderResult<FileLookup> {
    let by_name = FileQuery::new()
        .with_q(query::name_contains(name_or_id))
        .with_page_size(LOOKUP_PAGE_SIZE)
        .with_fields(LOOKUP_FIELDS);

    if let Some(file) = service.list_files(&by_name).await?.into_iter().next() {
        debug!(id = %file.id, "matched file by name");
        return Ok(FileLookup::FoundByName(file));
    }

    match service.get_file(name_or_id).await {
        Ok(mut file) => {
            if file.id.is_empty() {
                file.id = name_or_id.to_string();
            }
            debug!(id = %file.id, "matched file by id");
            Ok(FileLookup::FoundById(file))
        }
        Err(e) if e.is_not_found() => {
            debug!("no file by name or id: {}", e);
            Ok(FileLookup::NotFound)
        }
        Err(e) => Err(e),
    }
}

/// Content of a file, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Decoded text.
    Text(String),
    /// The file is not text; nothing was downloaded.
    Binary,
}

/// Reads a file's content according to its MIME type.
pub async fn read_content(service: &dyn DriveService, file: &DriveFile) -> ProviderResult<FileContent> {
    match ContentKind::classify(&file.mime_type) {
        ContentKind::GoogleDocument => {
            let text = service.export_text(&file.id).await?;
            Ok(FileContent::Text(text))
        }
        ContentKind::Text => {
            let bytes = service.download(&file.id).await?;
            let text = String::from_utf8(bytes).map_err(|e| {
                ProviderError::invalid_response(format!("{} is not valid UTF-8", file.name))
                    .with_source(e)
            })?;
            Ok(FileContent::Text(text))
        }
        ContentKind::Binary => Ok(FileContent::Binary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use crate::testing::{DriveCall, FakeDrive};

    #[test]
    fn classify_mime_types() {
        assert_eq!(
            ContentKind::classify("application/vnd.google-apps.document"),
            ContentKind::GoogleDocument
        );
        assert_eq!(ContentKind::classify("text/plain"), ContentKind::Text);
        assert_eq!(ContentKind::classify("text/markdown"), ContentKind::Text);
        assert_eq!(ContentKind::classify("application/json"), ContentKind::Text);
        assert_eq!(ContentKind::classify("application/xml"), ContentKind::Text);
        assert_eq!(ContentKind::classify("application/x-yaml"), ContentKind::Text);
        assert_eq!(ContentKind::classify("image/png"), ContentKind::Binary);
        assert_eq!(ContentKind::classify("application/pdf"), ContentKind::Binary);
        assert_eq!(
            ContentKind::classify("application/vnd.google-apps.spreadsheet"),
            ContentKind::Binary
        );
    }

    #[tokio::test]
    async fn lookup_prefers_name_match() {
        let drive = FakeDrive::new().with_files(vec![
            DriveFile::new("1", "weekly report", "text/plain"),
            DriveFile::new("2", "report draft", "text/plain"),
        ]);

        let lookup = lookup_file(&drive, "report").await.unwrap();
        assert_eq!(
            lookup,
            FileLookup::FoundByName(DriveFile::new("1", "weekly report", "text/plain"))
        );
        assert!(!drive.calls().iter().any(|c| matches!(c, DriveCall::Get(_))));
    }

    #[tokio::test]
    async fn lookup_falls_back_to_id() {
        let drive = FakeDrive::new().with_file_by_id(DriveFile::new("abc123", "Doc", "text/plain"));

        let lookup = lookup_file(&drive, "abc123").await.unwrap();
        assert!(matches!(lookup, FileLookup::FoundById(ref f) if f.id == "abc123"));
    }

    #[tokio::test]
    async fn lookup_not_found() {
        let drive = FakeDrive::new();

        let lookup = lookup_file(&drive, "missing").await.unwrap();
        assert_eq!(lookup, FileLookup::NotFound);
        assert!(lookup.file().is_none());
    }

    #[tokio::test]
    async fn lookup_propagates_other_errors() {
        let drive = FakeDrive::new().with_get_error(ProviderErrorCode::AuthorizationFailed);

        let err = lookup_file(&drive, "abc").await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthorizationFailed);
    }

    #[tokio::test]
    async fn google_document_is_exported() {
        let drive = FakeDrive::new().with_export("exported text");
        let file = DriveFile::new("d1", "Plan", "application/vnd.google-apps.document");

        let content = read_content(&drive, &file).await.unwrap();
        assert_eq!(content, FileContent::Text("exported text".into()));
        assert_eq!(drive.calls(), vec![DriveCall::Export("d1".into())]);
    }

    #[tokio::test]
    async fn text_file_is_downloaded() {
        let drive = FakeDrive::new().with_download(b"# Notes\n".to_vec());
        let file = DriveFile::new("t1", "notes.md", "text/markdown");

        let content = read_content(&drive, &file).await.unwrap();
        assert_eq!(content, FileContent::Text("# Notes\n".into()));
        assert_eq!(drive.calls(), vec![DriveCall::Download("t1".into())]);
    }

    #[tokio::test]
    async fn binary_file_is_never_fetched() {
        let drive = FakeDrive::new();
        let file = DriveFile::new("p1", "photo.png", "image/png");

        let content = read_content(&drive, &file).await.unwrap();
        assert_eq!(content, FileContent::Binary);
        assert!(drive.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_utf8_is_an_error() {
        let drive = FakeDrive::new().with_download(vec![0xff, 0xfe]);
        let file = DriveFile::new("t1", "data.json", "application/json");

        let err = read_content(&drive, &file).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
    }
}
