//! Diagnostic classification, formatting and routing.

use crate::diagnostic::{Diagnostic, Severity};
use crate::line::line_at;
use crate::sink::DiagnosticSink;
use std::sync::Arc;

/// Counts of what one `report` call routed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
}

impl ReportSummary {
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Returns `true` if any diagnostic is an error.
///
/// Callers evaluate this before reporting, so the write decision never
/// depends on the order lines reach the sink.
#[inline]
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// Formats diagnostics and dispatches them to a [`DiagnosticSink`].
#[derive(Clone)]
pub struct DiagnosticReporter {
    sink: Arc<dyn DiagnosticSink>,
}

impl DiagnosticReporter {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// Report every diagnostic of one invocation.
    ///
    /// `source` is the text the diagnostics were produced from; it is used
    /// to turn offsets into line numbers. Reporting never stops early.
    pub fn report(&self, source: &str, diagnostics: &[Diagnostic]) -> ReportSummary {
        let mut summary = ReportSummary::default();

        for diagnostic in diagnostics {
            let line = self.format(source, diagnostic);
            match diagnostic.severity {
                Severity::Error => {
                    summary.errors += 1;
                    self.sink.error(&line);
                }
                Severity::Warning => {
                    summary.warnings += 1;
                    self.sink.warn(&line);
                }
            }
        }

        summary
    }

    /// Format one diagnostic.
    ///
    /// `<PREFIX><code> [<file>:<line>]: <message>` when the position is
    /// known, `<PREFIX><code>: <message>` otherwise.
    pub fn format(&self, source: &str, diagnostic: &Diagnostic) -> String {
        format_diagnostic(source, diagnostic)
    }
}

impl std::fmt::Debug for DiagnosticReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticReporter").finish_non_exhaustive()
    }
}

fn format_diagnostic(source: &str, diagnostic: &Diagnostic) -> String {
    match &diagnostic.position {
        Some(position) => format!(
            "{} [{}:{}]: {}",
            diagnostic.code,
            position.file,
            line_at(source, position.offset),
            diagnostic.message
        ),
        None => format!("{}: {}", diagnostic.code, diagnostic.message),
    }
}
