//! Principal identity values.

use super::{PrincipalDomainError, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a principal issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Creates a validated principal identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalDomainError::EmptyPrincipalId`] when the value is
    /// blank.
    pub fn new(value: impl Into<String>) -> Result<Self, PrincipalDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PrincipalDomainError::EmptyPrincipalId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PrincipalId {
    type Error = PrincipalDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PrincipalId> for String {
    fn from(value: PrincipalId) -> Self {
        value.0
    }
}

impl AsRef<str> for PrincipalId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bearer credential presented by a caller.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalDomainError::EmptyAccessToken`] when the value is
    /// blank.
    pub fn new(value: impl Into<String>) -> Result<Self, PrincipalDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PrincipalDomainError::EmptyAccessToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the token as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// An identified user with a role and department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: PrincipalId,
    name: String,
    role: Role,
    department: String,
}

impl Principal {
    /// Department assigned when none is recorded.
    pub const UNASSIGNED_DEPARTMENT: &'static str = "Unassigned";

    /// Creates a principal.
    ///
    /// A blank department is normalised to [`Self::UNASSIGNED_DEPARTMENT`].
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalDomainError::EmptyName`] when the name is blank.
    pub fn new(
        id: PrincipalId,
        name: impl Into<String>,
        role: Role,
        department: impl Into<String>,
    ) -> Result<Self, PrincipalDomainError> {
        let raw_name = name.into();
        let trimmed_name = raw_name.trim();
        if trimmed_name.is_empty() {
            return Err(PrincipalDomainError::EmptyName);
        }
        let raw_department = department.into();
        let trimmed_department = raw_department.trim();
        let normalized_department = if trimmed_department.is_empty() {
            Self::UNASSIGNED_DEPARTMENT
        } else {
            trimmed_department
        };

        Ok(Self {
            id,
            name: trimmed_name.to_owned(),
            role,
            department: normalized_department.to_owned(),
        })
    }

    /// Returns the principal identifier.
    #[must_use]
    pub const fn id(&self) -> &PrincipalId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the department.
    #[must_use]
    pub fn department(&self) -> &str {
        &self.department
    }

    /// Returns a copy of this principal carrying a new display name.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalDomainError::EmptyName`] when the name is blank.
    pub fn renamed(&self, name: impl Into<String>) -> Result<Self, PrincipalDomainError> {
        Self::new(self.id.clone(), name, self.role, self.department.clone())
    }
}
