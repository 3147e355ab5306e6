//! Task store and task lifecycle controller.
//!
//! Tasks move through `pending -> working -> submitted_for_review ->
//! completed`, with managers able to send a submission back to `working`
//! together with feedback. Creating a task and commenting on one notify the
//! other party through the notification engine; status changes are
//! compare-and-set so that concurrent callers cannot both win.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
