//! # Kiln
//!
//! Staged JavaScript and TypeScript transpilation written in Rust.
//!
//! This crate holds the command-line front end and re-exports the Kiln
//! sub-crates.
//!
//! ## Crates
//!
//! - [`ember`] - Diagnostics and their reporting
//! - [`glaze`] - Tools wrapping the oxc compiler pipeline
//! - [`shelf`] - Target staging and the build graph

pub mod commands;
pub mod config;
pub mod discover;
pub mod error;
pub mod logging;

/// Diagnostics and their reporting.
pub use kiln_ember as ember;

/// Tools wrapping the oxc compiler pipeline.
pub use kiln_glaze as glaze;

/// Target staging and the build graph.
pub use kiln_shelf as shelf;

pub use error::{CliError, CliResult};
