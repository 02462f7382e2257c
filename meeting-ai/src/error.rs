//! Error types for meeting AI operations.

use std::fmt;

/// Universal error type that abstracts provider-specific errors into common variants.
///
/// All provider implementations map their native errors to these variants,
/// preserving context while keeping the pipeline provider-agnostic. The
/// retry loops in the pipeline only need [`Error::is_transient`] to decide
/// how to report a failed attempt; every variant is still retried within
/// the configured budget.
#[derive(Debug)]
pub enum Error {
    /// OAuth or API key authentication failures. Indicates credentials are invalid,
    /// expired, or lack necessary permissions.
    Authentication(String),

    /// Network connectivity issues, DNS failures, or connection timeouts.
    Network(String),

    /// Invalid parameters, missing required fields, or malformed configuration.
    /// These errors indicate a programming error and should be fixed at development time.
    Configuration(String),

    /// Server-side provider failures (5xx-class responses). Typically transient.
    Provider(String),

    /// Operation exceeded the configured or provider-enforced timeout period.
    Timeout(String),

    /// Provider rate limit exceeded. Clients must wait before retrying.
    RateLimited { retry_after_seconds: u64 },

    /// Failed to serialize data to JSON.
    Serialization(String),

    /// Failed to deserialize JSON data to the expected type.
    Deserialization(String),

    /// Catch-all for errors that don't fit other categories.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Whether this error is a transient transport or server-side failure.
    ///
    /// Transient errors are logged as retryable; all other errors are logged
    /// with their raw error text. Both count against the same retry budget.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Network(_)
                | Error::Provider(_)
                | Error::Timeout(_)
                | Error::RateLimited { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            Error::Network(msg) => write!(f, "Network error: {}", msg),
            Error::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Provider(msg) => write!(f, "Provider error: {}", msg),
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::RateLimited {
                retry_after_seconds,
            } => {
                write!(f, "Rate limited: retry after {}s", retry_after_seconds)
            }
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Error::Other(err) => write!(f, "Other error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_variants() {
        assert!(Error::Network("connection reset".to_string()).is_transient());
        assert!(Error::Provider("502 Bad Gateway".to_string()).is_transient());
        assert!(Error::RateLimited {
            retry_after_seconds: 10
        }
        .is_transient());
    }

    #[test]
    fn test_non_transient_variants() {
        assert!(!Error::Authentication("expired".to_string()).is_transient());
        assert!(!Error::Deserialization("bad json".to_string()).is_transient());
        assert!(!Error::Configuration("missing key".to_string()).is_transient());
    }
}
