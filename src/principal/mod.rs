//! Identity and role directory collaborator.
//!
//! Authentication and user management live outside this crate. The core only
//! consumes two contracts: resolving a principal by identifier and
//! identifying the principal behind a set of credentials. Both are modelled
//! as ports so production deployments can bind them to the real identity
//! provider while tests use the in-memory adapter.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
