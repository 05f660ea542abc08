//! Conversation message model handed to the archiver.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// A single content block inside a message.
///
/// Blocks of any other `type`, and known blocks with the wrong shape, become
/// [`ContentBlock::Unknown`] when read as part of a [`MessageContent`] and
/// contribute no text, so one odd block never sinks a whole archive batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },
    /// Model reasoning
    Thinking { thinking: String },
    /// Tool invocation requested by the assistant
    #[serde(alias = "tool_call", alias = "tool_use")]
    ToolCall {
        #[serde(default)]
        id: Option<String>,
        name: String,
        #[serde(default)]
        arguments: Value,
    },
    /// Anything else (images, audio, future block types)
    #[serde(other)]
    Unknown,
}

impl ContentBlock {
    /// Text block shorthand.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Message content: either a bare string or a list of blocks.
///
/// Deserialization is lenient per block. Content that is neither a string
/// nor a list reads as no blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    /// Content blocks, treating a bare string as one text block.
    pub fn blocks(&self) -> Cow<'_, [ContentBlock]> {
        match self {
            Self::Text(text) => Cow::Owned(vec![ContentBlock::text(text.as_str())]),
            Self::Blocks(blocks) => Cow::Borrowed(blocks.as_slice()),
        }
    }
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Blocks(Vec::new())
    }
}

impl<'de> Deserialize<'de> for MessageContent {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::Blocks(items.into_iter().map(parse_block).collect()),
            Value::Null => Self::default(),
            other => {
                tracing::warn!(value = %other, "Ignoring message content that is not a string or list");
                Self::default()
            }
        })
    }
}

fn parse_block(value: Value) -> ContentBlock {
    match serde_json::from_value(value) {
        Ok(block) => block,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping malformed content block");
            ContentBlock::Unknown
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<ContentBlock>> for MessageContent {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        Self::Blocks(blocks)
    }
}

/// One message of the live conversation history, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum AgentMessage {
    /// User message
    User {
        #[serde(default)]
        content: MessageContent,
    },
    /// Assistant (AI) response
    Assistant {
        #[serde(default)]
        content: MessageContent,
    },
    /// Output of a tool call
    #[serde(alias = "tool_result", alias = "tool")]
    ToolResult {
        #[serde(default, alias = "toolName")]
        tool_name: Option<String>,
        #[serde(default, alias = "toolCallId")]
        tool_call_id: Option<String>,
        #[serde(default)]
        content: MessageContent,
    },
}

impl AgentMessage {
    /// User message with plain text.
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Assistant message.
    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::Assistant {
            content: content.into(),
        }
    }

    /// Tool result message.
    pub fn tool_result(tool_name: Option<&str>, content: impl Into<MessageContent>) -> Self {
        Self::ToolResult {
            tool_name: tool_name.map(str::to_string),
            tool_call_id: None,
            content: content.into(),
        }
    }

    /// Role name as used on the wire.
    pub const fn role(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::Assistant { .. } => "assistant",
            Self::ToolResult { .. } => "toolResult",
        }
    }

    /// Message content.
    pub fn content(&self) -> &MessageContent {
        match self {
            Self::User { content } | Self::Assistant { content } | Self::ToolResult { content, .. } => {
                content
            }
        }
    }
}
