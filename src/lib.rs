//! `inflation-index` library crate.
//!
//! The binary (`infl`) is a thin wrapper around this library so that:
//!
//! - the index arithmetic is testable without spawning processes or touching the network
//! - provider adapters stay reusable by other front-ends (pages, scheduled jobs)
//! - code stays easy to navigate as providers are added

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod events;
pub mod index;
pub mod io;
pub mod math;
pub mod notify;
pub mod report;
