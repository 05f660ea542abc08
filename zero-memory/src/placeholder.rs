//! Placeholder text that replaces archived messages in the live history.

use chrono::{DateTime, Utc};
use std::path::Path;
use zero_common::Zone;

/// Tool a downstream agent uses to look archived content back up.
pub const MEMORY_SEARCH_TOOL: &str = "memory_search";

/// Build the placeholder for `message_count` archived messages.
///
/// Plain text only, safe to use as the sole content of a synthetic user
/// message. The path line is present only when `archive_path` is given.
pub fn create_drop_placeholder(
    message_count: usize,
    archive_path: Option<&Path>,
    timestamp: Option<DateTime<Utc>>,
    zone: Zone,
) -> String {
    let stamp = zone.date_time_stamp(timestamp.unwrap_or_else(Utc::now));

    let mut lines = vec![
        format!("[Archived {stamp}: {message_count} messages]"),
        "Earlier messages were moved to memory to keep the context window small.".to_string(),
    ];
    if let Some(path) = archive_path {
        lines.push(format!("Archive: {}", path.display()));
    }
    lines.push(format!(
        "Use {MEMORY_SEARCH_TOOL} to retrieve details from the archived conversation."
    ));

    lines.join("\n")
}
