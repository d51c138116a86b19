//! Line formatting shared by the command handlers.
//!
//! Every listing the tools print is one line per item, indented by two
//! spaces, with an emoji marker in front.

/// Marker for folders.
pub const FOLDER_ICON: &str = "📁";
/// Marker for anything that is not a folder.
pub const FILE_ICON: &str = "📄";
/// Marker for calendar events.
pub const EVENT_ICON: &str = "🕒";

/// Returns the icon for a MIME type.
pub fn file_icon(mime_type: &str) -> &'static str {
    if mime_type.contains("folder") {
        FOLDER_ICON
    } else {
        FILE_ICON
    }
}

/// Returns the date part (first ten characters) of an RFC 3339 timestamp,
/// or `?` when the timestamp is missing.
pub fn short_date(timestamp: Option<&str>) -> &str {
    match timestamp {
        Some(ts) => match ts.char_indices().nth(10) {
            Some((idx, _)) => &ts[..idx],
            None => ts,
        },
        None => "?",
    }
}

/// Formats a file as `  {icon} {name}  (ID: {id})`.
pub fn file_line(mime_type: &str, name: &str, id: &str) -> String {
    format!("  {} {}  (ID: {})", file_icon(mime_type), name, id)
}

/// Formats a file as `  {icon} [{date}] {name}  (ID: {id})`.
pub fn file_line_with_date(
    mime_type: &str,
    modified: Option<&str>,
    name: &str,
    id: &str,
) -> String {
    format!(
        "  {} [{}] {}  (ID: {})",
        file_icon(mime_type),
        short_date(modified),
        name,
        id
    )
}

/// Formats an event as `  🕒 {start} - {title}`.
pub fn event_line(start: &str, title: &str) -> String {
    format!("  {} {} - {}", EVENT_ICON, start, title)
}
