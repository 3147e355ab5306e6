//! Shared error taxonomy surfaced to callers of the core services.
//!
//! Each service keeps its own typed error enum; [`ErrorKind`] is the coarse
//! classification a transport layer uses to pick a response and decide
//! whether a retry makes sense.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of service failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input.
    Validation,
    /// A role or ownership check failed.
    Forbidden,
    /// A referenced task, notification, or principal is absent.
    NotFound,
    /// The requested status edge is not defined for the current state.
    InvalidTransition,
    /// Storage or infrastructure failure.
    Internal,
}

impl ErrorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::InvalidTransition => "invalid_transition",
            Self::Internal => "internal",
        }
    }

    /// Returns `true` when the caller may safely retry the same request.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Internal)
    }

    /// Returns `true` for failures caused by the request itself.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
