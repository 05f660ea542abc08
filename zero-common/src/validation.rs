//! Configuration validation for Zero session services.
//!
//! The freshness evaluator trusts its inputs; range checks on reset policies
//! happen here, once, when configuration is loaded.

use thiserror::Error;

use crate::config::{Config, MemoryConfig, ObservabilityConfig, SessionConfig, SessionResetPolicy};
use crate::timezone::Zone;

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    if errors.is_empty() {
        Ok(())
    } else if errors.len() == 1 {
        Err(errors.remove(0))
    } else {
        Err(ValidationError::Multiple(errors))
    }
}

fn check_policy(field: &str, policy: &SessionResetPolicy) -> ValidationResult<()> {
    match *policy {
        SessionResetPolicy::Never => Ok(()),
        SessionResetPolicy::Daily { at_hour } if at_hour > 23 => Err(ValidationError::InvalidValue {
            field: format!("{field}.at_hour"),
            reason: format!("{at_hour} is not an hour of day (0-23)"),
        }),
        SessionResetPolicy::Idle { idle_minutes } if idle_minutes <= 0 => {
            Err(ValidationError::InvalidValue {
                field: format!("{field}.idle_minutes"),
                reason: format!("{idle_minutes} must be greater than zero"),
            })
        }
        _ => Ok(()),
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Some(policy) = &self.reset {
            if let Err(e) = check_policy("session.reset", policy) {
                errors.push(e);
            }
        }

        let typed = self
            .reset_by_type
            .iter()
            .map(|(key, policy)| (format!("session.reset_by_type.{key}"), policy));
        let channels = self
            .reset_by_channel
            .iter()
            .map(|(key, policy)| (format!("session.reset_by_channel.{key}"), policy));

        for (field, policy) in typed.chain(channels) {
            if let Err(e) = check_policy(&field, policy) {
                errors.push(e);
            }
        }

        collect(errors)
    }
}

impl Validate for MemoryConfig {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(tz) = self.timezone.as_deref() {
            tz.parse::<Zone>()
                .map_err(|e| ValidationError::InvalidValue {
                    field: "memory.timezone".into(),
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if !matches!(
            self.log_level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            errors.push(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("unknown level '{}'", self.log_level),
            });
        }

        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            errors.push(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("expected 'json' or 'pretty', got '{}'", self.log_format),
            });
        }

        collect(errors)
    }
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let errors = [
            self.session.validate(),
            self.memory.validate(),
            self.observability.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        collect(errors)
    }

    /// Load and validate configuration.
    pub fn load_and_validate() -> anyhow::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }
}
