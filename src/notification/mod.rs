//! Notification engine.
//!
//! Notifications are created only as side effects of task lifecycle
//! actions, are owned by a single recipient, and move from unread to read
//! exactly once. The engine has no opinion on *when* to notify; that is the
//! task lifecycle service's job.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The engine service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
