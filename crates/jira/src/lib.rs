//! Jira tracker client for JackBot.
//!
//! This crate provides a trait-based tracker interface with a Jira
//! REST (agile + v3) reference implementation.

#![warn(missing_docs)]

pub mod trait_;
pub mod client;

mod parse;

pub use client::{JiraClient, JiraConfig};
pub use trait_::{Result, Tracker, TrackerError};
