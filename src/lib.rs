//! Lattice client library crate.

/// Core library modules and APIs.
pub mod core;

/// Receptor API models and client.
pub mod receptor;

/// CLI argument parsing and adapters (only when the `cli` feature is enabled).
#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub mod app;

/// Test doubles for the receptor and log stream.
#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

mod config;
mod error;

pub use config::*;
pub use error::*;
