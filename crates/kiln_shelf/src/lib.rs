//! # kiln_shelf
//!
//! Shelf - Staging and building targets for Kiln.
//!
//! ## Name Origin
//!
//! Before firing, pieces are set out on the kiln **shelf**, each in its own
//! place. `kiln_shelf` lays every source out as a target with its own
//! output path and tool, then fires the ones that changed.
//!
//! ## Example
//!
//! ```ignore
//! use kiln_ember::{DiagnosticReporter, TracingSink};
//! use kiln_shelf::{BuildGraph, BuildOptions, Source, Stager};
//! use kiln_glaze::ToolOptions;
//! use std::sync::Arc;
//!
//! let stager = Stager::from_options(ToolOptions::default(), ToolOptions::default())?;
//! let targets = stager.stage(
//!     "dist".as_ref(),
//!     &[Source::text("main.mjs", "export const answer = 42;")],
//! )?;
//!
//! let mut graph = BuildGraph::new();
//! graph.extend(targets);
//! let report = graph.build(
//!     &DiagnosticReporter::new(Arc::new(TracingSink)),
//!     &BuildOptions::default(),
//! )?;
//! assert!(report.success());
//! ```

mod error;
mod fingerprint;
mod graph;
mod source;
mod stager;
mod target;

pub use error::{StageError, StageResult};
pub use fingerprint::{fingerprint, Fingerprints};
pub use graph::{BuildGraph, BuildOptions, BuildReport, TargetReport, TargetStatus};
pub use source::Source;
pub use stager::{output_path, transpile, Stager, DEFAULT_MODULE_SUFFIXES, OUTPUT_EXTENSION};
pub use target::Target;
