//! Plain-text rendering of messages for the archive.
//!
//! - user: text blocks, newline-joined
//! - assistant: text verbatim, thinking as a short bracketed summary, tool
//!   calls as a bracketed name (arguments are not archived)
//! - tool result: text blocks capped per block, prefixed with the tool name

use zero_common::util::{truncate_with_ellipsis, truncate_with_marker};

use crate::message::{AgentMessage, ContentBlock, MessageContent};

/// Characters of a thinking block kept in the archive.
pub const THINKING_SUMMARY_CHARS: usize = 200;

/// Characters of each tool result text block kept in the archive.
pub const TOOL_RESULT_MAX_CHARS: usize = 500;

/// Tool name used when a tool result does not carry one.
pub const DEFAULT_TOOL_NAME: &str = "tool";

/// Extract the archivable text of a message. May be empty.
pub fn extract_message_text(message: &AgentMessage) -> String {
    match message {
        AgentMessage::User { content } => user_text(content),
        AgentMessage::Assistant { content } => assistant_text(content),
        AgentMessage::ToolResult {
            tool_name, content, ..
        } => tool_result_text(tool_name.as_deref(), content),
    }
}

fn user_text(content: &MessageContent) -> String {
    match content {
        MessageContent::Text(text) => text.clone(),
        MessageContent::Blocks(blocks) => blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn assistant_text(content: &MessageContent) -> String {
    content
        .blocks()
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.clone()),
            ContentBlock::Thinking { thinking } if !thinking.trim().is_empty() => Some(format!(
                "[Thinking: {}]",
                truncate_with_ellipsis(thinking, THINKING_SUMMARY_CHARS)
            )),
            ContentBlock::ToolCall { name, .. } => Some(format!("[Tool call: {name}]")),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn tool_result_text(tool_name: Option<&str>, content: &MessageContent) -> String {
    let body = content
        .blocks()
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(truncate_with_marker(text, TOOL_RESULT_MAX_CHARS)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    if body.trim().is_empty() {
        return String::new();
    }

    let name = tool_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_TOOL_NAME);
    format!("[{name} result]: {body}")
}
