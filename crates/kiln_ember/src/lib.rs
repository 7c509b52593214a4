//! # kiln_ember
//!
//! Ember - Diagnostics for the Kiln build pipeline.
//!
//! ## Name Origin
//!
//! An **ember** is what glows after the fire: the small, telling trace of
//! what happened inside the kiln. `kiln_ember` holds the diagnostics a
//! transpile invocation leaves behind and routes each one to the channel
//! that should hear about it.
//!
//! ## Example
//!
//! ```
//! use kiln_ember::{CollectingSink, Diagnostic, DiagnosticCode, DiagnosticReporter};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(CollectingSink::new());
//! let reporter = DiagnosticReporter::new(sink.clone());
//!
//! let source = "let x = 1;\nlet = ;\n";
//! let diagnostics = vec![
//!     Diagnostic::error(DiagnosticCode::SYNTAX, "Unexpected token").at("main.js", 16),
//! ];
//!
//! let summary = reporter.report(source, &diagnostics);
//! assert_eq!(summary.errors, 1);
//! assert_eq!(sink.errors(), vec!["KL1001 [main.js:2]: Unexpected token".to_string()]);
//! ```

mod diagnostic;
mod line;
mod reporter;
mod sink;

pub use diagnostic::*;
pub use line::line_at;
pub use reporter::{has_errors, DiagnosticReporter, ReportSummary};
pub use sink::{Channel, CollectingSink, ConsoleSink, DiagnosticSink, ReportedLine, TracingSink};
