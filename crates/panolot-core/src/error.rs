//! Error handling for panolot.
//!
//! Provides error types for all layers of the annotation engine:
//! - Validation errors (operator input, point-count minimums)
//! - Transport errors (persistence backend unreachable or rejecting)
//! - Auth errors (expired session)
//! - Render errors (malformed stored geometry)
//!
//! All error types use `thiserror` for ergonomic error handling. Every
//! error is terminal to the current operation only; the annotation state
//! machine never transitions to a crashed state.

use thiserror::Error;

/// Operator-input validation error.
///
/// Reported inline in the active editor, never sent to the network; the
/// current draft is preserved so the operator can correct and retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required editor field is empty.
    #[error("Required field '{field}' is missing")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// A field that must be numeric could not be parsed.
    #[error("Field '{field}' must be numeric")]
    NotNumeric {
        /// The name of the non-numeric field.
        field: String,
    },

    /// Another lot in the same project already carries this number.
    #[error("Lot \"{number}\" already exists in this project")]
    DuplicateLotNumber {
        /// The duplicated lot number.
        number: String,
    },

    /// The draft has fewer points than the shape requires.
    #[error("At least {needed} points are required, got {got}")]
    TooFewPoints {
        /// Minimum number of points for the shape being committed.
        needed: usize,
        /// Number of points currently in the draft.
        got: usize,
    },
}

/// Persistence transport error.
///
/// Surfaced as a blocking notice; the operation is aborted and the draft
/// preserved so the operator can retry.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The backend could not be reached at all.
    #[error("Backend unreachable: {reason}")]
    Unreachable {
        /// The underlying connection failure.
        reason: String,
    },

    /// The backend answered with a non-success status.
    #[error("Backend error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, or a generic one.
        message: String,
    },
}

/// Authentication error.
///
/// Distinct from other transport failures because it must not be retried:
/// local credentials are cleared and the operator is sent back to the
/// entry point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The stored session token is no longer accepted.
    #[error("Session expired, sign in again")]
    SessionExpired,
}

/// Stored-geometry rendering error.
///
/// Logged and the offending entity skipped, so one corrupt record cannot
/// blank the entire viewer.
#[derive(Error, Debug, Clone)]
pub enum RenderError {
    /// The persisted geometry JSON could not be decoded.
    #[error("Malformed geometry for entity {entity_id}: {reason}")]
    MalformedGeometry {
        /// Row id of the offending record.
        entity_id: i64,
        /// Decode failure description.
        reason: String,
    },

    /// The record names an entity kind the viewer does not know.
    #[error("Unknown entity kind '{kind}' for entity {entity_id}")]
    UnknownKind {
        /// Row id of the offending record.
        entity_id: i64,
        /// The unrecognized kind tag.
        kind: String,
    },
}

/// Main error type for panolot.
///
/// A unified error type that can represent any failure from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Operator-input validation error.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persistence transport error.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Authentication error.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Stored-geometry rendering error.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message.
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a validation error (kept inline, never fatal).
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Check if this is an auth error (must not be retried).
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Check if this is a transport error (retryable by the operator).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Result type using Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_helpers() {
        let v: Error = ValidationError::TooFewPoints { needed: 2, got: 1 }.into();
        assert!(v.is_validation());
        assert!(!v.is_auth());

        let a: Error = AuthError::SessionExpired.into();
        assert!(a.is_auth());

        let t: Error = TransportError::Unreachable {
            reason: "connection refused".into(),
        }
        .into();
        assert!(t.is_transport());
    }

    #[test]
    fn messages_read_well() {
        let e = ValidationError::DuplicateLotNumber { number: "A1".into() };
        assert_eq!(e.to_string(), "Lot \"A1\" already exists in this project");
    }
}
