//! In-memory directory used by tests and the seeding tool.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::principal::{
    domain::{AccessToken, Principal, PrincipalId},
    ports::{
        AuthContext, AuthError, PrincipalDirectory, PrincipalDirectoryError,
        PrincipalDirectoryResult,
    },
};

/// Thread-safe in-memory principal directory and token verifier.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPrincipalDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    principals: HashMap<PrincipalId, Principal>,
    tokens: HashMap<AccessToken, PrincipalId>,
}

impl InMemoryPrincipalDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory pre-populated with the given principals.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalDirectoryError::Unavailable`] when the directory
    /// lock is poisoned.
    pub fn with_principals(
        principals: impl IntoIterator<Item = Principal>,
    ) -> PrincipalDirectoryResult<Self> {
        let directory = Self::new();
        for principal in principals {
            directory.insert(principal)?;
        }
        Ok(directory)
    }

    /// Registers or replaces a principal.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalDirectoryError::Unavailable`] when the directory
    /// lock is poisoned.
    pub fn insert(&self, principal: Principal) -> PrincipalDirectoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            PrincipalDirectoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        state.principals.insert(principal.id().clone(), principal);
        Ok(())
    }

    /// Binds an access token to a registered principal.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalDirectoryError::NotFound`] when the principal is
    /// not registered.
    pub fn issue_token(
        &self,
        id: &PrincipalId,
        token: AccessToken,
    ) -> PrincipalDirectoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            PrincipalDirectoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        if !state.principals.contains_key(id) {
            return Err(PrincipalDirectoryError::NotFound(id.clone()));
        }
        state.tokens.insert(token, id.clone());
        Ok(())
    }

    /// Changes the display name of a registered principal.
    ///
    /// Names already copied onto tasks and comments are snapshots and do not
    /// follow the rename.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalDirectoryError::NotFound`] when the principal is
    /// not registered, or [`PrincipalDirectoryError::Domain`] when the new
    /// name is blank.
    pub fn rename(&self, id: &PrincipalId, name: &str) -> PrincipalDirectoryResult<Principal> {
        let mut state = self.state.write().map_err(|err| {
            PrincipalDirectoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let current = state
            .principals
            .get(id)
            .ok_or_else(|| PrincipalDirectoryError::NotFound(id.clone()))?;
        let renamed = current.renamed(name)?;
        state.principals.insert(id.clone(), renamed.clone());
        Ok(renamed)
    }
}

#[async_trait]
impl PrincipalDirectory for InMemoryPrincipalDirectory {
    async fn resolve(&self, id: &PrincipalId) -> PrincipalDirectoryResult<Principal> {
        let state = self.state.read().map_err(|err| {
            PrincipalDirectoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        state
            .principals
            .get(id)
            .cloned()
            .ok_or_else(|| PrincipalDirectoryError::NotFound(id.clone()))
    }
}

#[async_trait]
impl AuthContext for InMemoryPrincipalDirectory {
    async fn identify(&self, token: &AccessToken) -> Result<Principal, AuthError> {
        let state = self
            .state
            .read()
            .map_err(|err| AuthError::unavailable(std::io::Error::other(err.to_string())))?;
        state
            .tokens
            .get(token)
            .and_then(|id| state.principals.get(id))
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}
