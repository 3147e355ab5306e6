//! Authentication port mapping credentials to principals.

use crate::principal::domain::{AccessToken, Principal};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Credential verification contract.
#[async_trait]
pub trait AuthContext: Send + Sync {
    /// Identifies the principal that owns the credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] when the token is unknown.
    async fn identify(&self, token: &AccessToken) -> Result<Principal, AuthError>;
}

/// Errors returned by authentication implementations.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The credentials do not identify any principal.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The authentication backend failed.
    #[error("authentication backend unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
    /// Wraps a backend error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
