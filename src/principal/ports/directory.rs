//! Directory port for resolving principals by identifier.

use crate::principal::domain::{Principal, PrincipalDomainError, PrincipalId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory lookups.
pub type PrincipalDirectoryResult<T> = Result<T, PrincipalDirectoryError>;

/// Principal lookup contract.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Resolves a principal's current identity, role, and department.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalDirectoryError::NotFound`] when no principal has the
    /// identifier.
    async fn resolve(&self, id: &PrincipalId) -> PrincipalDirectoryResult<Principal>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum PrincipalDirectoryError {
    /// No principal has the identifier.
    #[error("principal not found: {0}")]
    NotFound(PrincipalId),

    /// A directory update carried an invalid value.
    #[error(transparent)]
    Domain(#[from] PrincipalDomainError),

    /// The directory backend could not be reached.
    #[error("principal directory unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl PrincipalDirectoryError {
    /// Wraps a backend error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
