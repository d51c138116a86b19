//! Google Drive API client.
//!
//! Covers the Drive API v3 calls behind [`DriveService`]: listing, metadata,
//! export, chunked download, resumable upload and multipart creation.

use std::io::SeekFrom;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, LOCATION, RANGE};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, info};

use crate::BoxFuture;
use crate::error::{ProviderError, ProviderResult};
use crate::http::{build_client, check_status, read_json};

use super::{DriveFile, DriveService, FileQuery, NewFile};

/// Base URL for Drive API v3 metadata calls.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Base URL for Drive API v3 media uploads.
const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Fields requested for files returned by create/upload calls.
const CREATED_FIELDS: &str = "id,name,mimeType";

/// Bytes requested per download range.
pub const DOWNLOAD_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// Bytes sent per resumable upload request. Drive requires multiples of
/// 256 KiB for every chunk but the last.
pub const UPLOAD_CHUNK_SIZE: u64 = 32 * 256 * 1024;

/// Google Drive API client.
#[derive(Debug)]
pub struct GoogleDriveClient {
    http_client: reqwest::Client,
    access_token: String,
    api_base: String,
    upload_base: String,
    download_chunk_size: u64,
    upload_chunk_size: u64,
}

impl GoogleDriveClient {
    /// Creates a new Google Drive client with the given access token.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            http_client: build_client(timeout)?,
            access_token: access_token.into(),
            api_base: DRIVE_API_BASE.to_string(),
            upload_base: DRIVE_UPLOAD_BASE.to_string(),
            download_chunk_size: DOWNLOAD_CHUNK_SIZE,
            upload_chunk_size: UPLOAD_CHUNK_SIZE,
        })
    }

    /// Points metadata calls at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base = base_url.into();
        self
    }

    /// Points upload calls at a different API root.
    pub fn with_upload_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.upload_base = base_url.into();
        self
    }

    /// Overrides the transfer chunk sizes. Drive itself rejects upload chunks
    /// that are not multiples of 256 KiB.
    pub fn with_chunk_sizes(mut self, download: u64, upload: u64) -> Self {
        self.download_chunk_size = download.max(1);
        self.upload_chunk_size = upload.max(1);
        self
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/files/{}", self.api_base, urlencoding::encode(file_id))
    }

    async fn fetch_files(&self, query: &FileQuery) -> ProviderResult<Vec<DriveFile>> {
        let mut params: Vec<(&str, String)> = vec![("fields", query.fields.clone())];
        if let Some(ref q) = query.q {
            params.push(("q", q.clone()));
        }
        if let Some(size) = query.page_size {
            params.push(("pageSize", size.to_string()));
        }
        if let Some(ref order_by) = query.order_by {
            params.push(("orderBy", order_by.clone()));
        }

        let response = self
            .http_client
            .get(format!("{}/files", self.api_base))
            .bearer_auth(&self.access_token)
            .query(&params)
            .send()
            .await?;

        let list: FileListResponse = read_json(check_status(response).await?).await?;
        debug!(q = ?query.q, "files.list returned {} files", list.files.len());
        Ok(list.files)
    }

    async fn fetch_file(&self, file_id: &str) -> ProviderResult<DriveFile> {
        let response = self
            .http_client
            .get(self.file_url(file_id))
            .bearer_auth(&self.access_token)
            .query(&[("fields", "id,name,mimeType")])
            .send()
            .await?;

        read_json(check_status(response).await?).await
    }

    async fn fetch_export(&self, file_id: &str) -> ProviderResult<String> {
        let response = self
            .http_client
            .get(format!("{}/export", self.file_url(file_id)))
            .bearer_auth(&self.access_token)
            .query(&[("mimeType", "text/plain")])
            .send()
            .await?;

        check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read export: {}", e)))
    }

    /// Downloads file media in fixed-size ranges until the last byte arrives.
    async fn fetch_media(&self, file_id: &str) -> ProviderResult<Vec<u8>> {
        let url = self.file_url(file_id);
        let mut content = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let end = offset + self.download_chunk_size - 1;
            let response = self
                .http_client
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&[("alt", "media")])
                .header(RANGE, format!("bytes={}-{}", offset, end))
                .send()
                .await?;

            // An empty file has no satisfiable range.
            if response.status() == StatusCode::RANGE_NOT_SATISFIABLE && offset == 0 {
                break;
            }

            let response = check_status(response).await?;
            let partial = response.status() == StatusCode::PARTIAL_CONTENT;
            let total = response
                .headers()
                .get(CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_content_range_total);

            let chunk = response
                .bytes()
                .await
                .map_err(|e| ProviderError::network(format!("failed to read download: {}", e)))?;
            offset += chunk.len() as u64;
            content.extend_from_slice(&chunk);

            debug!(offset, ?total, "downloaded chunk of {} bytes", chunk.len());

            let done = !partial
                || chunk.is_empty()
                || total.is_some_and(|t| offset >= t)
                || (total.is_none() && (chunk.len() as u64) < self.download_chunk_size);
            if done {
                break;
            }
        }

        Ok(content)
    }

    /// Uploads a local file through a resumable session.
    async fn upload_resumable(&self, metadata: &NewFile, path: &Path) -> ProviderResult<DriveFile> {
        let mut file = tokio::fs::File::open(path).await.map_err(|e| {
            ProviderError::internal(format!("failed to open {}: {}", path.display(), e))
                .with_source(e)
        })?;
        let total = file
            .metadata()
            .await
            .map_err(|e| ProviderError::internal(format!("failed to stat upload: {}", e)))?
            .len();

        let response = self
            .http_client
            .post(format!("{}/files", self.upload_base))
            .bearer_auth(&self.access_token)
            .query(&[("uploadType", "resumable"), ("fields", CREATED_FIELDS)])
            .header("X-Upload-Content-Length", total.to_string())
            .json(metadata)
            .send()
            .await?;

        let response = check_status(response).await?;
        let session_url = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| {
                ProviderError::invalid_response("resumable session response had no Location")
            })?;

        debug!(total, "opened resumable upload session");

        let mut offset: u64 = 0;
        loop {
            let mut chunk = Vec::new();
            (&mut file)
                .take(self.upload_chunk_size)
                .read_to_end(&mut chunk)
                .await
                .map_err(|e| ProviderError::internal(format!("failed to read upload: {}", e)))?;

            let sent_to = offset + chunk.len() as u64;
            let content_range = if total == 0 {
                "bytes */0".to_string()
            } else {
                format!("bytes {}-{}/{}", offset, sent_to - 1, total)
            };

            let response = self
                .http_client
                .put(&session_url)
                .bearer_auth(&self.access_token)
                .header(CONTENT_RANGE, content_range)
                .header(CONTENT_LENGTH, chunk.len())
                .body(chunk)
                .send()
                .await?;

            // 308 Resume Incomplete: the server tells us how far it got.
            if response.status().as_u16() == 308 {
                let next = response
                    .headers()
                    .get(RANGE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(parse_received_range)
                    .unwrap_or(0);
                if next != sent_to {
                    file.seek(SeekFrom::Start(next)).await.map_err(|e| {
                        ProviderError::internal(format!("failed to seek upload: {}", e))
                    })?;
                }
                offset = next;
                debug!(offset, total, "upload in progress");
                continue;
            }

            let created: DriveFile = read_json(check_status(response).await?).await?;
            info!(id = %created.id, "uploaded {}", path.display());
            return Ok(created);
        }
    }

    /// Creates a text file with a single `multipart/related` request.
    async fn upload_multipart(&self, metadata: &NewFile, content: &str) -> ProviderResult<DriveFile> {
        let boundary = format!("skillbox-{:016x}", rand::random::<u64>());
        let metadata_json = serde_json::to_string(metadata)
            .map_err(|e| ProviderError::internal(format!("failed to encode metadata: {}", e)))?;
        let body = multipart_related_body(&boundary, &metadata_json, "text/plain", content);

        let response = self
            .http_client
            .post(format!("{}/files", self.upload_base))
            .bearer_auth(&self.access_token)
            .query(&[("uploadType", "multipart"), ("fields", CREATED_FIELDS)])
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await?;

        let created: DriveFile = read_json(check_status(response).await?).await?;
        info!(id = %created.id, "created {}", created.name);
        Ok(created)
    }
}

impl DriveService for GoogleDriveClient {
    fn list_files<'a>(&'a self, query: &'a FileQuery) -> BoxFuture<'a, ProviderResult<Vec<DriveFile>>> {
        Box::pin(async move { self.fetch_files(query).await.map_err(drive_error) })
    }

    fn get_file<'a>(&'a self, file_id: &'a str) -> BoxFuture<'a, ProviderResult<DriveFile>> {
        Box::pin(async move { self.fetch_file(file_id).await.map_err(drive_error) })
    }

    fn export_text<'a>(&'a self, file_id: &'a str) -> BoxFuture<'a, ProviderResult<String>> {
        Box::pin(async move { self.fetch_export(file_id).await.map_err(drive_error) })
    }

    fn download<'a>(&'a self, file_id: &'a str) -> BoxFuture<'a, ProviderResult<Vec<u8>>> {
        Box::pin(async move { self.fetch_media(file_id).await.map_err(drive_error) })
    }

    fn upload_file<'a>(
        &'a self,
        metadata: &'a NewFile,
        path: &'a Path,
    ) -> BoxFuture<'a, ProviderResult<DriveFile>> {
        Box::pin(async move {
            self.upload_resumable(metadata, path)
                .await
                .map_err(drive_error)
        })
    }

    fn create_text_file<'a>(
        &'a self,
        metadata: &'a NewFile,
        content: &'a str,
    ) -> BoxFuture<'a, ProviderResult<DriveFile>> {
        Box::pin(async move {
            self.upload_multipart(metadata, content)
                .await
                .map_err(drive_error)
        })
    }
}

/// Tags an error with the service it came from.
fn drive_error(err: ProviderError) -> ProviderError {
    err.with_provider("drive")
}

/// Response from the files.list endpoint.
#[derive(Debug, serde::Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Parses the total size from a `Content-Range: bytes a-b/total` header.
fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse().ok()
}

/// Parses a resumable-upload `Range: bytes=0-n` header into the next offset.
fn parse_received_range(value: &str) -> Option<u64> {
    let (_, last) = value.trim().strip_prefix("bytes=")?.split_once('-')?;
    last.parse::<u64>().ok().map(|n| n + 1)
}

/// Builds a `multipart/related` body with a JSON metadata part and one media part.
fn multipart_related_body(
    boundary: &str,
    metadata_json: &str,
    media_type: &str,
    media: &str,
) -> String {
    format!(
        "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{meta}\r\n\
         --{b}\r\nContent-Type: {mt}\r\n\r\n{media}\r\n\
         --{b}--\r\n",
        b = boundary,
        meta = metadata_json,
        mt = media_type,
        media = media,
    )
}
