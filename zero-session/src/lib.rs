//! Zero Session - reset policies and freshness checks for persisted sessions.
//!
//! A session manager asks two questions before continuing a conversation:
//!
//! 1. Which reset policy applies to this session? ([`resolve_policy`])
//! 2. Under that policy, is the session still fresh at `now`? ([`evaluate_freshness`])
//!
//! ```text
//! override ─┐
//! by type ──┼── first present wins ──→ SessionResetPolicy ──┐
//! global ───┤                                               ├── FreshnessResult
//! default ──┘                       updated_at, now, zone ──┘
//! ```
//!
//! Both functions are pure: the caller supplies the clock.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod boundary;
pub mod freshness;
pub mod policy;

pub use boundary::{daily_reset_boundary, next_daily_reset};
pub use freshness::{evaluate_freshness, FreshnessResult};
pub use policy::{resolve_channel_override, resolve_policy, SessionResetType};
pub use zero_common::{SessionConfig, SessionResetPolicy, Zone};
