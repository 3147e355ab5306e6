//! Domain model for principals and their fixed roles.

mod error;
mod principal;
mod role;

pub use error::{ParseRoleError, PrincipalDomainError};
pub use principal::{AccessToken, Principal, PrincipalId};
pub use role::Role;
