//! Error types for principal validation and parsing.

use thiserror::Error;

/// Errors returned while constructing principal values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrincipalDomainError {
    /// The principal identifier is empty after trimming.
    #[error("principal identifier must not be empty")]
    EmptyPrincipalId,

    /// The display name is empty after trimming.
    #[error("principal name must not be empty")]
    EmptyName,

    /// The access token is empty after trimming.
    #[error("access token must not be empty")]
    EmptyAccessToken,
}

/// Error returned while parsing roles from external input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
