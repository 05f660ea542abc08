//! Zero Memory - Memory archive for the Zero ecosystem.
//!
//! When a conversation outgrows the model's context window, the oldest
//! messages are dropped from the live history. This crate makes sure they
//! are not lost:
//!
//! - Dropped messages are appended to `{workspace}/memory/{YYYY-MM-DD}.md`
//! - A short placeholder takes their place in the live history, pointing at
//!   the archive and at the `memory_search` tool
//!
//! ```text
//! [m0 m1 m2 m3 | m4 m5]  ──archive──→  memory/2026-10-18.md (append)
//!        ↓
//! [placeholder | m4 m5]
//! ```
//!
//! Archival always happens before removal; a failed write leaves the
//! history untouched.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod archive;
pub mod compaction;
pub mod extract;
pub mod message;
pub mod placeholder;

// Re-export commonly used types
pub use archive::{
    archive_messages_to_memory, archive_path_for, format_archive_block, ArchiveOptions,
    ArchiveOutcome, ARCHIVE_MARKER, MEMORY_DIR,
};
pub use compaction::{compact_with_archive, CompactionOutcome};
pub use extract::extract_message_text;
pub use message::{AgentMessage, ContentBlock, MessageContent};
pub use placeholder::{create_drop_placeholder, MEMORY_SEARCH_TOOL};
