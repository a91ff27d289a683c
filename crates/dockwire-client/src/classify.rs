//! Status-code classification for container-targeting calls.

use dockwire_common::error::{DockwireError, Result};
use thiserror::Error;

/// Caller-actionable failure derived from a response status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The targeted container does not exist (404).
    #[error("container not found: {id}")]
    NotFound {
        /// Container the request targeted.
        id: String,
    },
    /// The daemon failed internally (500).
    #[error("docker daemon error: {reason}")]
    ServerError {
        /// Reason text reported with the status.
        reason: String,
    },
}

impl From<DomainError> for DockwireError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { id } => Self::ContainerNotFound { id },
            DomainError::ServerError { reason } => Self::Server { reason },
        }
    }
}

/// Maps a status code to a domain error. Any code other than 404 and 500
/// classifies as `None` and the call counts as successful.
#[must_use]
pub fn classify(status: u16, reason: &str, target_id: &str) -> Option<DomainError> {
    match status {
        404 => Some(DomainError::NotFound {
            id: target_id.to_string(),
        }),
        500 => Some(DomainError::ServerError {
            reason: reason.to_string(),
        }),
        _ => None,
    }
}

/// Turns the status of a start, kill, or delete call into a `Result`.
///
/// # Errors
///
/// Returns `DockwireError::ContainerNotFound` on 404 and
/// `DockwireError::Server` on 500.
pub fn check_container_response(id: &str, status: u16, reason: &str) -> Result<()> {
    classify(status, reason, id).map_or(Ok(()), |err| Err(err.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_target_id() {
        assert_eq!(
            classify(404, "Not Found", "c0ffee"),
            Some(DomainError::NotFound { id: "c0ffee".into() })
        );
    }

    #[test]
    fn server_error_carries_reason() {
        assert_eq!(
            classify(500, "Internal Server Error", "c0ffee"),
            Some(DomainError::ServerError {
                reason: "Internal Server Error".into()
            })
        );
    }

    #[test]
    fn other_codes_are_unclassified() {
        for status in [200, 201, 204, 304, 400, 409, 501, 503] {
            assert_eq!(classify(status, "whatever", "c0ffee"), None, "status {status}");
        }
    }

    #[test]
    fn check_maps_into_workspace_errors() {
        assert!(check_container_response("abc", 204, "No Content").is_ok());
        assert!(matches!(
            check_container_response("abc", 404, "Not Found"),
            Err(DockwireError::ContainerNotFound { id }) if id == "abc"
        ));
        assert!(matches!(
            check_container_response("abc", 500, "Internal Server Error"),
            Err(DockwireError::Server { reason }) if reason == "Internal Server Error"
        ));
    }
}
