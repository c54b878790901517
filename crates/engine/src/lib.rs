//! JackBot reconciliation engine.
//!
//! The single-consumer event pipeline: webhook payloads are queued by
//! the receiver, classified by the dispatcher, and routed to either the
//! reconciler (estimate rollups + status derivation) or the burndown
//! reporter. A weekday scheduler triggers the same reporter path on a
//! calendar cadence, independently of the queue.

#![warn(missing_docs)]

mod error;

mod dispatcher;
mod reconciler;
mod reporter;
mod scheduler;

#[cfg(test)]
mod testutil;

pub use error::EngineError;

pub use dispatcher::{Dispatcher, EventQueue};
pub use reconciler::Reconciler;
pub use reporter::Reporter;
pub use scheduler::{next_fire, Scheduler};
