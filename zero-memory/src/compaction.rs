//! Archive-then-splice compaction of the live message history.

use chrono::Utc;
use std::path::Path;
use zero_common::Result;

use crate::archive::{archive_messages_to_memory, ArchiveOptions, ArchiveOutcome};
use crate::message::AgentMessage;
use crate::placeholder::create_drop_placeholder;

/// Result of a successful compaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactionOutcome {
    /// Where the dropped messages were written.
    pub archive: ArchiveOutcome,
    /// Text of the message that replaced them.
    pub placeholder: String,
}

/// Drop the oldest `drop_count` messages from `messages`, archiving them first.
///
/// The dropped prefix is replaced by a single user message carrying the
/// placeholder. If archiving fails, the error is returned and `messages`
/// is left exactly as it was. Returns `None` when there is nothing to drop.
pub async fn compact_with_archive(
    messages: &mut Vec<AgentMessage>,
    drop_count: usize,
    workspace_dir: &Path,
    options: &ArchiveOptions,
) -> Result<Option<CompactionOutcome>> {
    let drop_count = drop_count.min(messages.len());
    if drop_count == 0 {
        return Ok(None);
    }

    // One instant for both the archive header and the placeholder.
    let options = ArchiveOptions {
        timestamp: Some(options.timestamp.unwrap_or_else(Utc::now)),
        ..options.clone()
    };

    let archive = archive_messages_to_memory(&messages[..drop_count], workspace_dir, &options).await?;

    let placeholder = create_drop_placeholder(
        archive.message_count,
        Some(archive.archive_path.as_path()),
        options.timestamp,
        options.zone,
    );
    messages.drain(..drop_count);
    messages.insert(0, AgentMessage::user(placeholder.clone()));

    tracing::debug!(
        dropped = archive.message_count,
        remaining = messages.len(),
        "Compacted message history"
    );

    Ok(Some(CompactionOutcome {
        archive,
        placeholder,
    }))
}
