//! Drive commands.

use std::io::{self, Write};
use std::path::Path;

use skillbox_core::{file_line, file_line_with_date};
use skillbox_providers::ProviderResult;
use skillbox_providers::drive::{
    DriveService, FileContent, FileLookup, FileQuery, NewFile, ORDER_RECENT_FIRST,
    SEARCH_PAGE_SIZE, find_folder, lookup_file, query, read_content,
};
use tracing::{debug, warn};

use crate::config::DriveSettings;

/// Printed when the tool runs without a command.
pub const BANNER: &str = "Google Drive Tool
Commands: list, search, read, upload, create
Usage: drive-tool <command> [args]";

/// Prints the banner.
pub fn banner(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", BANNER)
}

/// `list [page-size]`: most recently modified files first.
pub async fn list(
    service: &dyn DriveService,
    args: &[String],
    settings: &DriveSettings,
    out: &mut dyn Write,
) -> io::Result<()> {
    let page_size = match args.first() {
        None => settings.list_page_size,
        Some(arg) => match arg.parse::<u32>() {
            Ok(size) => size,
            Err(_) => return writeln!(out, "Invalid page size: {}", arg),
        },
    };

    let query = FileQuery::new()
        .with_page_size(page_size)
        .with_order_by(ORDER_RECENT_FIRST);
    let files = match service.list_files(&query).await {
        Ok(files) => files,
        Err(e) => return writeln!(out, "Error listing files: {}", e),
    };

    if files.is_empty() {
        return writeln!(out, "No files found.");
    }

    writeln!(out, "Found {} files:\n", files.len())?;
    for file in &files {
        writeln!(
            out,
            "{}",
            file_line_with_date(
                &file.mime_type,
                file.modified_time.as_deref(),
                &file.name,
                &file.id
            )
        )?;
    }
    Ok(())
}

/// `search <query>`: files whose name contains the query.
pub async fn search(
    service: &dyn DriveService,
    args: &[String],
    out: &mut dyn Write,
) -> io::Result<()> {
    let Some(term) = args.first() else {
        return writeln!(out, "Usage: search <query>");
    };

    let query = FileQuery::new()
        .with_q(query::name_contains(term))
        .with_page_size(SEARCH_PAGE_SIZE)
        .with_order_by(ORDER_RECENT_FIRST);
    let files = match service.list_files(&query).await {
        Ok(files) => files,
        Err(e) => return writeln!(out, "Error searching files: {}", e),
    };

    if files.is_empty() {
        return writeln!(out, "No files matching '{}'.", term);
    }

    writeln!(out, "Found {} matching files:\n", files.len())?;
    for file in &files {
        writeln!(out, "{}", file_line(&file.mime_type, &file.name, &file.id))?;
    }
    Ok(())
}

/// `read <name-or-id>`: prints a document or text file.
pub async fn read(
    service: &dyn DriveService,
    args: &[String],
    out: &mut dyn Write,
) -> io::Result<()> {
    let Some(target) = args.first() else {
        return writeln!(out, "Usage: read <filename_or_id>");
    };

    let file = match lookup_file(service, target).await.map(FileLookup::into_file) {
        Ok(Some(file)) => file,
        Ok(None) => return writeln!(out, "File not found: {}", target),
        Err(e) => return writeln!(out, "Error reading file: {}", e),
    };

    match read_content(service, &file).await {
        Ok(FileContent::Text(text)) => {
            writeln!(out, "--- {} ---\n", file.name)?;
            writeln!(out, "{}", text)
        }
        Ok(FileContent::Binary) => {
            writeln!(
                out,
                "Cannot read binary file: {} ({})",
                file.name, file.mime_type
            )?;
            writeln!(out, "File ID: {}", file.id)
        }
        Err(e) => writeln!(out, "Error reading file: {}", e),
    }
}

/// `upload <path> [folder]`: uploads a local file.
pub async fn upload(
    service: &dyn DriveService,
    args: &[String],
    settings: &DriveSettings,
    out: &mut dyn Write,
) -> io::Result<()> {
    let Some(local) = args.first() else {
        return writeln!(out, "Usage: upload <local_file_path> [drive_folder_name]");
    };

    let path = Path::new(local);
    if !path.exists() {
        return writeln!(out, "File not found: {}", local);
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| local.clone());
    let folder = args.get(1).unwrap_or(&settings.default_folder);

    let result = async {
        let metadata = NewFile::new(name).in_folder(destination(service, folder).await?);
        service.upload_file(&metadata, path).await
    }
    .await;

    match result {
        Ok(file) => writeln!(out, "✅ Uploaded: {} (ID: {})", file.name, file.id),
        Err(e) => writeln!(out, "Error uploading file: {}", e),
    }
}

/// `create <filename> <content...>`: creates a text file from the arguments.
pub async fn create(
    service: &dyn DriveService,
    args: &[String],
    settings: &DriveSettings,
    out: &mut dyn Write,
) -> io::Result<()> {
    let [filename, words @ ..] = args else {
        return writeln!(out, "Usage: create <filename> <content>");
    };
    if words.is_empty() {
        return writeln!(out, "Usage: create <filename> <content>");
    }
    let content = words.join(" ");

    let result = async {
        let folder = destination(service, &settings.default_folder).await?;
        let metadata = NewFile::new(filename).in_folder(folder);
        service.create_text_file(&metadata, &content).await
    }
    .await;

    match result {
        Ok(file) => writeln!(out, "✅ Created: {} (ID: {})", file.name, file.id),
        Err(e) => writeln!(out, "Error creating file: {}", e),
    }
}

/// Resolves the destination folder; `None` means the Drive root.
async fn destination(service: &dyn DriveService, folder: &str) -> ProviderResult<Option<String>> {
    let id = find_folder(service, folder).await?;
    match id {
        Some(ref id) => debug!(%id, "using folder {}", folder),
        None => warn!("folder '{}' not found, using the Drive root", folder),
    }
    Ok(id)
}
