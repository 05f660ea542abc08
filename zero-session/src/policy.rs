//! Reset policy resolution.
//!
//! Precedence, highest first:
//!
//! 1. explicit override (typically a per-channel policy)
//! 2. `session.reset_by_type[<reset type>]`
//! 3. `session.reset`
//! 4. built-in default: daily at 04:00

use serde::{Deserialize, Serialize};
use std::fmt;
use zero_common::{SessionConfig, SessionResetPolicy};

/// Session key segments that mark a thread or topic conversation.
const THREAD_MARKERS: &[&str] = &[":thread:", ":topic:"];

/// Session key segments that mark a group conversation.
const GROUP_MARKERS: &[&str] = &[":group:", ":channel:"];

/// Kind of session, used to pick a per-type reset policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionResetType {
    /// One-to-one conversation
    Direct,
    /// Group chat or channel
    Group,
    /// Thread or topic inside a group
    Thread,
}

impl SessionResetType {
    /// Key used in `session.reset_by_type`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Group => "group",
            Self::Thread => "thread",
        }
    }

    /// Classify a session from its key and the channel's flags.
    ///
    /// Threads win over groups: a thread inside a group is a `Thread`.
    pub fn classify(session_key: &str, is_group: bool, is_thread: bool) -> Self {
        let key = session_key.to_ascii_lowercase();
        let has = |markers: &[&str]| markers.iter().any(|m| key.contains(m));

        if is_thread || has(THREAD_MARKERS) {
            Self::Thread
        } else if is_group || has(GROUP_MARKERS) {
            Self::Group
        } else {
            Self::Direct
        }
    }
}

impl fmt::Display for SessionResetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the effective reset policy for a session.
///
/// Never fails: every missing tier falls through to the next, and the last
/// tier is the built-in default.
pub fn resolve_policy(
    config: Option<&SessionConfig>,
    reset_type: &str,
    reset_override: Option<SessionResetPolicy>,
) -> SessionResetPolicy {
    let tiers: [(&str, Option<SessionResetPolicy>); 3] = [
        ("override", reset_override),
        (
            "type",
            config.and_then(|c| c.reset_by_type.get(reset_type).copied()),
        ),
        ("global", config.and_then(|c| c.reset)),
    ];

    let (source, policy) = tiers
        .into_iter()
        .find_map(|(source, policy)| policy.map(|p| (source, p)))
        .unwrap_or(("default", SessionResetPolicy::default()));

    tracing::debug!(reset_type = %reset_type, source, policy = %policy, "Resolved session reset policy");
    policy
}

/// Look up a per-channel policy to pass as the override tier.
///
/// Channel names are matched case-insensitively after trimming.
pub fn resolve_channel_override(
    config: Option<&SessionConfig>,
    channel: Option<&str>,
) -> Option<SessionResetPolicy> {
    let channel = channel.map(str::trim).filter(|c| !c.is_empty())?;
    let config = config?;

    if let Some(policy) = config.reset_by_channel.get(channel) {
        return Some(*policy);
    }

    config
        .reset_by_channel
        .iter()
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(channel))
        .map(|(_, policy)| *policy)
}
