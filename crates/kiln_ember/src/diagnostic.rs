//! Diagnostic types.
//!
//! A diagnostic's severity and position are decided once, where the
//! transpiler's own report is converted, and never re-inferred later.

use serde::Serialize;
use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fails the target; output is not written.
    Error,
    /// Informational; does not block the write.
    Warning,
}

/// A diagnostic code such as `KL1001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    pub prefix: &'static str,
    pub number: u32,
}

impl DiagnosticCode {
    /// Syntax error reported by the parser.
    pub const SYNTAX: Self = Self::new("KL", 1001);
    /// Early error reported by semantic analysis.
    pub const SEMANTIC: Self = Self::new("KL", 1002);
    /// Problem reported while lowering to the target language level.
    pub const TRANSFORM: Self = Self::new("KL", 2001);

    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.number)
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Where a diagnostic points in its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    /// File name as declared by the source (used for labeling only).
    pub file: String,
    /// Byte offset into the source text.
    pub offset: u32,
}

/// One message from a single transpile invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            position: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            position: None,
        }
    }

    /// Attach a source position.
    pub fn at(mut self, file: impl Into<String>, offset: u32) -> Self {
        self.position = Some(Position {
            file: file.into(),
            offset,
        });
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
