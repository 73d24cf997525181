// Error classification for the dashboard boundary
//
// The engine modules are infallible; every failure that reaches a caller is
// one of these variants, and the HTTP layer maps each to a status code.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DssError {
    /// Client supplied a malformed or out-of-range query parameter
    #[error("{0}")]
    Validation(String),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// The data store failed; only `context` is shown to callers
    #[error("{context}")]
    Dependency {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DssError {
    pub fn validation(message: impl Into<String>) -> Self {
        DssError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DssError::NotFound(message.into())
    }

    pub fn dependency(context: impl Into<String>, source: rusqlite::Error) -> Self {
        DssError::Dependency {
            context: context.into(),
            source,
        }
    }

    /// True for errors caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, DssError::Validation(_) | DssError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, DssError>;

/// Attach a caller-facing context message to a store error
pub trait StoreContext<T> {
    fn store_context(self, context: &str) -> Result<T>;
}

impl<T> StoreContext<T> for std::result::Result<T, rusqlite::Error> {
    fn store_context(self, context: &str) -> Result<T> {
        self.map_err(|source| DssError::dependency(context, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_hides_source_in_display() {
        let err = DssError::dependency(
            "Failed to load firms",
            rusqlite::Error::InvalidQuery,
        );

        assert_eq!(err.to_string(), "Failed to load firms");
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_client_errors() {
        assert!(DssError::validation("Invalid firm id").is_client_error());
        assert!(DssError::not_found("Firm not found").is_client_error());
        assert!(!DssError::Internal("lock".to_string()).is_client_error());
    }

    #[test]
    fn test_store_context() {
        let failed: std::result::Result<i64, rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        let err = failed.store_context("Failed to load settings").unwrap_err();

        assert!(matches!(err, DssError::Dependency { .. }));
        assert_eq!(err.to_string(), "Failed to load settings");
    }
}
