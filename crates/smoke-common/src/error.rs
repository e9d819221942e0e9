//! Common error types for the smoke harness.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using [`SmokeError`].
pub type SmokeResult<T> = Result<T, SmokeError>;

/// Errors raised while driving a container under test.
#[derive(Error, Diagnostic, Debug)]
pub enum SmokeError {
    /// The container runtime rejected a request or could not be reached.
    #[error("Container runtime error: {message}")]
    #[diagnostic(
        code(smoke::runtime),
        help("Check that the Docker daemon is running and DOCKER_HOST points at it")
    )]
    Runtime {
        /// The error message.
        message: String,
    },

    /// Container not found.
    #[error("Container not found: {name}")]
    #[diagnostic(code(smoke::container::not_found))]
    ContainerNotFound {
        /// The container name that was not found.
        name: String,
    },

    /// Invalid container name format.
    #[error("Invalid container name: {name}")]
    #[diagnostic(
        code(smoke::container::invalid_name),
        help("Container names start with a letter or digit and may contain letters, digits, '_', '.' and '-'")
    )]
    InvalidContainerName {
        /// The invalid container name.
        name: String,
    },

    /// The container did not exit within the configured bound.
    #[error("Container {name} did not exit within {timeout_secs}s")]
    #[diagnostic(
        code(smoke::container::wait_timeout),
        help("Raise --exit-timeout or drop it to wait without a bound")
    )]
    WaitTimedOut {
        /// The container name.
        name: String,
        /// The bound that elapsed.
        timeout_secs: u64,
    },
}

impl SmokeError {
    /// Build a [`SmokeError::Runtime`] from anything displayable.
    pub fn runtime(err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SmokeError::ContainerNotFound {
            name: "main".to_string(),
        };
        assert_eq!(err.to_string(), "Container not found: main");
    }

    #[test]
    fn wait_timeout_display() {
        let err = SmokeError::WaitTimedOut {
            name: "main".to_string(),
            timeout_secs: 30,
        };
        assert_eq!(err.to_string(), "Container main did not exit within 30s");
    }

    #[test]
    fn runtime_helper_keeps_message() {
        let err = SmokeError::runtime("connection refused");
        assert_eq!(
            err.to_string(),
            "Container runtime error: connection refused"
        );
    }
}
