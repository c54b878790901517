//! Slack notifier for JackBot.
//!
//! This crate provides a trait-based notifier interface, the Block Kit
//! burndown message builder, and an incoming-webhook reference
//! implementation with the diagnostic channel helpers the functional
//! tests use.

#![warn(missing_docs)]

pub mod trait_;
pub mod client;
pub mod message;

pub use client::{SlackClient, SlackNotifier};
pub use trait_::{Notifier, NotifierError, Result};
