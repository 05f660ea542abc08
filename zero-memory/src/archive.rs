//! Append-only markdown archive of compacted messages.
//!
//! Layout:
//! - `{workspace}/memory/{YYYY-MM-DD}.md` - one file per day (append-only)
//!
//! Every call appends one section. Files are never rewritten, truncated,
//! or deduplicated. Concurrent appends to the same file must be serialized
//! by the caller.

use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use zero_common::{Error, Result, ResultExt, Zone};

use crate::extract::extract_message_text;
use crate::message::AgentMessage;

/// Header line that starts every archived section.
pub const ARCHIVE_MARKER: &str = "## Archived Conversation (compaction)";

/// Directory under the workspace that holds daily archive files.
pub const MEMORY_DIR: &str = "memory";

/// Optional parameters for an archive write.
#[derive(Debug, Clone, Default)]
pub struct ArchiveOptions {
    /// Session identifier recorded in the section header.
    pub session_key: Option<String>,
    /// Archive time. Defaults to the current time.
    pub timestamp: Option<DateTime<Utc>>,
    /// Zone for the date stamp and header time. Defaults to system local.
    pub zone: Zone,
}

impl ArchiveOptions {
    /// Options with a session key.
    pub fn for_session(session_key: impl Into<String>) -> Self {
        Self {
            session_key: Some(session_key.into()),
            ..Default::default()
        }
    }

    /// Set the archive time.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the time zone.
    pub fn in_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }
}

/// Where a batch went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    /// File the section was appended to.
    pub archive_path: PathBuf,
    /// Number of messages in the batch, including ones that rendered no text.
    pub message_count: usize,
}

/// Daily archive file for `timestamp` in `zone`.
pub fn archive_path_for(workspace_dir: &Path, timestamp: DateTime<Utc>, zone: Zone) -> PathBuf {
    workspace_dir
        .join(MEMORY_DIR)
        .join(format!("{}.md", zone.date_stamp(timestamp)))
}

/// Render one archive section. Pure: same input, same bytes.
pub fn format_archive_block(
    messages: &[AgentMessage],
    session_key: Option<&str>,
    timestamp: DateTime<Utc>,
    zone: Zone,
) -> String {
    let mut block = String::new();

    let _ = writeln!(block);
    let _ = writeln!(block, "{ARCHIVE_MARKER}");
    let _ = writeln!(block, "**Archived at:** {}", zone.date_time_stamp(timestamp));
    if let Some(key) = session_key {
        let _ = writeln!(block, "**Session:** {}", single_line(key));
    }
    let _ = writeln!(block, "**Messages:** {}", messages.len());
    // Blank line keeps `---` from turning the header into a setext heading.
    let _ = writeln!(block);
    let _ = writeln!(block, "---");

    for message in messages {
        let text = extract_message_text(message);
        if text.trim().is_empty() {
            continue;
        }
        let _ = write!(block, "\n### {}\n{}\n", heading(message), text);
    }

    let _ = write!(block, "\n---\n");
    block
}

/// Header values must stay on one line; control characters become spaces.
fn single_line(value: &str) -> Cow<'_, str> {
    if value.chars().any(char::is_control) {
        Cow::Owned(
            value
                .chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(value)
    }
}

fn heading(message: &AgentMessage) -> String {
    match message {
        AgentMessage::User { .. } => "User".to_string(),
        AgentMessage::Assistant { .. } => "Assistant".to_string(),
        AgentMessage::ToolResult { tool_name, .. } => match tool_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("Tool Result ({name})"),
            _ => "Tool Result".to_string(),
        },
    }
}

/// Append `messages` to today's archive file under `workspace_dir`.
///
/// Creates `{workspace}/memory` if needed. The workspace directory itself
/// must already exist; a missing workspace is reported like any other
/// filesystem failure. Nothing is retried.
pub async fn archive_messages_to_memory(
    messages: &[AgentMessage],
    workspace_dir: &Path,
    options: &ArchiveOptions,
) -> Result<ArchiveOutcome> {
    let timestamp = options.timestamp.unwrap_or_else(Utc::now);

    let workspace_meta = fs::metadata(workspace_dir)
        .await
        .with_context(|| format!("Workspace {} is not accessible", workspace_dir.display()))?;
    if !workspace_meta.is_dir() {
        return Err(Error::InvalidInput(format!(
            "Workspace {} is not a directory",
            workspace_dir.display()
        )));
    }

    let memory_dir = workspace_dir.join(MEMORY_DIR);
    fs::create_dir_all(&memory_dir)
        .await
        .with_context(|| format!("Failed to create {}", memory_dir.display()))?;

    let archive_path = archive_path_for(workspace_dir, timestamp, options.zone);
    let block = format_archive_block(
        messages,
        options.session_key.as_deref(),
        timestamp,
        options.zone,
    );

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&archive_path)
        .await
        .with_context(|| format!("Failed to open {}", archive_path.display()))?;
    file.write_all(block.as_bytes())
        .await
        .with_context(|| format!("Failed to append to {}", archive_path.display()))?;
    file.flush()
        .await
        .with_context(|| format!("Failed to flush {}", archive_path.display()))?;

    tracing::info!(
        path = %archive_path.display(),
        messages = messages.len(),
        session = options.session_key.as_deref().unwrap_or("-"),
        "Archived compacted messages to memory"
    );

    Ok(ArchiveOutcome {
        archive_path,
        message_count: messages.len(),
    })
}
