//! Deskflow: departmental task lifecycle and notification fan-out.
//!
//! Managers assign tasks, assignees work on them and submit them for review,
//! and managers approve or send them back with feedback. Every assignment
//! and every comment notifies the other party.
//!
//! # Architecture
//!
//! Deskflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`principal`]: Identity and role directory contracts
//! - [`task`]: Task store and lifecycle controller
//! - [`notification`]: Notification engine
//! - [`config`]: Layered configuration
//! - [`telemetry`]: Structured logging setup
//! - [`error`]: Shared error classification

pub mod config;
pub mod error;
pub mod notification;
pub mod principal;
pub mod task;
pub mod telemetry;
