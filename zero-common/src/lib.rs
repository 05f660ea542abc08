//! Zero Common - Shared types, utilities, and configuration for Zero session services.
//!
//! This crate provides:
//! - Configuration types and loading (session reset policies, memory workspace)
//! - Configuration validation
//! - Error types and handling utilities
//! - Logging setup
//! - Time zone handling shared by freshness checks and memory archives
//! - Text utilities used across Zero services

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod timezone;
pub mod util;
pub mod validation;

pub use config::{
    Config, MemoryConfig, ObservabilityConfig, SessionConfig, SessionResetPolicy,
    DEFAULT_IDLE_MINUTES, DEFAULT_RESET_AT_HOUR,
};
pub use error::{Error, Result, ResultExt};
pub use timezone::Zone;
pub use validation::{Validate, ValidationError, ValidationResult};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{Config, SessionConfig, SessionResetPolicy};
    pub use crate::error::{Error, Result, ResultExt};
    pub use crate::logging::init_logging;
    pub use crate::timezone::Zone;
    pub use crate::validation::{Validate, ValidationError};
}
