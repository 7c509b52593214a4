//! # kiln_glaze
//!
//! Glaze - Reusable transpile tools for Kiln.
//!
//! ## Name Origin
//!
//! A **glaze** is applied to every piece of the same kind before firing,
//! the same coat each time. A `kiln_glaze` [`Tool`] is built once per kind
//! of source (ES module or classic script) and applied to every file of
//! that kind, lowering it with oxc and writing the result next to its
//! source map.
//!
//! ## Example
//!
//! ```ignore
//! use kiln_ember::{DiagnosticReporter, TracingSink};
//! use kiln_glaze::{Tool, ToolInput, ToolOptions};
//! use std::sync::Arc;
//!
//! let tool = Tool::module(ToolOptions::default())?;
//! let reporter = DiagnosticReporter::new(Arc::new(TracingSink));
//! let outcome = tool.invoke(
//!     "dist/main.js".as_ref(),
//!     &[ToolInput::file("src/main.mjs")],
//!     "main.mjs",
//!     &reporter,
//! )?;
//! assert!(outcome.written);
//! ```

mod error;
mod input;
mod options;
mod tool;
mod transpile;

pub use error::{ToolError, ToolResult};
pub use input::ToolInput;
pub use options::{Language, Newline, SourceMapMode, ToolKind, ToolOptions};
pub use tool::{sibling_map_path, Tool, ToolOutcome};
pub use transpile::{transpile, Emitted, EmittedMap, TranspileOutput};
