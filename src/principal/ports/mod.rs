//! Port contracts for the identity collaborator.

pub mod auth;
pub mod directory;

pub use auth::{AuthContext, AuthError};
pub use directory::{PrincipalDirectory, PrincipalDirectoryError, PrincipalDirectoryResult};
