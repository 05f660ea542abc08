//! Error types for the Zero session services.

use thiserror::Error;

/// Result type alias using the Zero error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Zero session services.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this error (or the error it wraps) came from the filesystem.
    pub fn is_io(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::WithContext { source, .. } => source.is_io(),
            _ => false,
        }
    }

    /// The underlying IO error kind, looking through any context wrappers.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io(e) => Some(e.kind()),
            Self::WithContext { source, .. } => source.io_kind(),
            _ => None,
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add lazily-built context to an error.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_with_context() {
        let err = Error::InvalidInput("workspace is a file".into());
        let with_ctx = err.with_context("archiving messages");
        assert!(matches!(with_ctx, Error::WithContext { .. }));
        assert_eq!(
            with_ctx.to_string(),
            "archiving messages: Invalid input: workspace is a file"
        );
    }

    #[test]
    fn test_io_kind_through_context() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let result: std::result::Result<(), std::io::Error> = Err(io);
        let err = result.context("creating memory dir").unwrap_err();

        assert!(err.is_io());
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_non_io_error() {
        let err = Error::Config("bad".into());
        assert!(!err.is_io());
        assert!(err.io_kind().is_none());
    }
}
