//! Unified error types for the dockwire workspace.
//!
//! Status-code classification produces the container and server variants;
//! the stream decoders produce [`DockwireError::Framing`] and
//! [`DockwireError::Build`]. Everything else is a transport or decoding
//! failure that reaches the caller as-is.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum DockwireError {
    /// The daemon reported that the targeted container does not exist.
    #[error("container not found: {id}")]
    ContainerNotFound {
        /// Identifier the caller asked for.
        id: String,
    },

    /// The daemon reported that the image named in a create request does not exist.
    #[error("image not found: {image}")]
    ImageNotFound {
        /// Image reference from the create request.
        image: String,
    },

    /// The daemon failed internally while handling a container request.
    #[error("docker daemon error: {reason}")]
    Server {
        /// Reason text reported with the status.
        reason: String,
    },

    /// Creating a container from an image failed.
    #[error("failed to create container from image {image}: {reason}")]
    CreateFailed {
        /// Image reference from the create request.
        image: String,
        /// Status or transport failure description.
        reason: String,
    },

    /// A request outside the classified lifecycle calls returned a non-success status.
    #[error("unexpected HTTP {status} ({reason}) from {path}: {message}")]
    UnexpectedStatus {
        /// Request path.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Reason text reported with the status.
        reason: String,
        /// Message the daemon put in the response body.
        message: String,
    },

    /// A multiplexed log stream ended inside a frame.
    #[error("truncated stream frame at byte {offset}: needed {needed} bytes, {remaining} remaining")]
    Framing {
        /// Byte offset where the incomplete header or payload begins.
        offset: usize,
        /// Bytes the frame declared.
        needed: usize,
        /// Bytes actually left in the buffer.
        remaining: usize,
    },

    /// A build stream finished without naming the built image.
    #[error("{message}")]
    Build {
        /// Failure description.
        message: String,
        /// Error texts the daemon emitted during the build.
        daemon_errors: Vec<String>,
    },

    /// The HTTP exchange itself failed.
    #[error("{method} {path} failed: {message}")]
    Transport {
        /// HTTP method.
        method: String,
        /// Request path.
        path: String,
        /// Underlying failure description.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, DockwireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_error_displays_bare_message() {
        let err = DockwireError::Build {
            message: crate::constants::BUILD_ID_MISSING.to_string(),
            daemon_errors: vec!["no such file".into()],
        };
        assert_eq!(err.to_string(), "Can't obtain ID from build output stream.");
    }

    #[test]
    fn not_found_names_container() {
        let err = DockwireError::ContainerNotFound { id: "abc".into() };
        assert_eq!(err.to_string(), "container not found: abc");
    }

    #[test]
    fn serde_errors_convert() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: DockwireError = source.into();
        assert!(matches!(err, DockwireError::Serialization { .. }));
    }
}
