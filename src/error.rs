//! Error types and handling for the spine library

use thiserror::Error;

/// Result type alias for spine operations
pub type Result<T> = std::result::Result<T, SpineError>;

/// Main error type for the spine library
///
/// Note that the hot-path operations (`get`, `publish`, `cursor`,
/// `try_push`, `try_pop`) never return errors. Full and empty are
/// ordinary outcomes reported by value; this enum covers construction,
/// system-resource and shutdown conditions only.
#[derive(Error, Debug)]
pub enum SpineError {
    /// I/O errors surfaced by adapter implementations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration parameter
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message describing the configuration issue
        message: String,
    },

    /// System resource errors (mmap, mlock, thread placement)
    #[error("System resource error: {message}")]
    SystemResource {
        /// Error message describing the system resource issue
        message: String,
    },

    /// CPU affinity errors
    #[error("CPU affinity error: {0}")]
    CpuAffinity(#[from] nix::Error),

    /// A wait was interrupted because the owning component shut down
    #[error("Shut down while waiting")]
    Shutdown,

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,

    /// Generic error for conditions a correctly functioning system
    /// should never reach
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Error message describing the unexpected condition
        message: String,
    },
}

impl SpineError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new system resource error
    pub fn system_resource(message: impl Into<String>) -> Self {
        Self::SystemResource {
            message: message.into(),
        }
    }

    /// Create a new unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable by retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Io(_))
    }

    /// Check if this error is related to system resources
    pub fn is_system_resource_error(&self) -> bool {
        matches!(self, Self::SystemResource { .. } | Self::CpuAffinity(_))
    }
}

/// Convenience macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::error::SpineError::config(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SpineError::config("test message");
        assert!(matches!(err, SpineError::InvalidConfig { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_classification() {
        let timeout = SpineError::Timeout;
        assert!(timeout.is_recoverable());
        assert!(!timeout.is_system_resource_error());

        let mem_err = SpineError::system_resource("mlock failed");
        assert!(!mem_err.is_recoverable());
        assert!(mem_err.is_system_resource_error());

        let shutdown = SpineError::Shutdown;
        assert!(!shutdown.is_recoverable());
    }

    #[test]
    fn test_error_macros() {
        let err = config_error!("Invalid capacity: {}", 1000);
        assert!(matches!(err, SpineError::InvalidConfig { .. }));
    }
}
