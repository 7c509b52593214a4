//! Log channels that receive formatted diagnostic lines.

use serde::Serialize;
use std::sync::Mutex;

/// The two channels a diagnostic can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Error,
    Warning,
}

/// Destination for formatted diagnostics.
///
/// The error channel is what the build treats as failing; the warning
/// channel is informational. Sinks are shared between targets built in
/// parallel, so they must be `Send + Sync`.
pub trait DiagnosticSink: Send + Sync {
    fn error(&self, line: &str);
    fn warn(&self, line: &str);
}

/// Routes diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn error(&self, line: &str) {
        tracing::error!("{}", line);
    }

    fn warn(&self, line: &str) {
        tracing::warn!("{}", line);
    }
}

/// Prints diagnostics to stderr with colored labels.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    color: bool,
}

impl ConsoleSink {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn render(&self, label: &str, ansi: &str, line: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}:\x1b[0m {}", ansi, label, line)
        } else {
            format!("{}: {}", label, line)
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DiagnosticSink for ConsoleSink {
    fn error(&self, line: &str) {
        eprintln!("{}", self.render("error", "31", line));
    }

    fn warn(&self, line: &str) {
        eprintln!("{}", self.render("warning", "33", line));
    }
}

/// A line received by a [`CollectingSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedLine {
    pub channel: Channel,
    pub text: String,
}

/// Keeps every reported line in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<ReportedLine>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines received so far.
    pub fn lines(&self) -> Vec<ReportedLine> {
        self.lock().clone()
    }

    /// Text of the lines sent to the error channel.
    pub fn errors(&self) -> Vec<String> {
        self.texts(Channel::Error)
    }

    /// Text of the lines sent to the warning channel.
    pub fn warnings(&self) -> Vec<String> {
        self.texts(Channel::Warning)
    }

    /// Drain the collected lines.
    pub fn take(&self) -> Vec<ReportedLine> {
        std::mem::take(&mut *self.lock())
    }

    fn texts(&self, channel: Channel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|l| l.channel == channel)
            .map(|l| l.text.clone())
            .collect()
    }

    fn push(&self, channel: Channel, line: &str) {
        self.lock().push(ReportedLine {
            channel,
            text: line.to_string(),
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ReportedLine>> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DiagnosticSink for CollectingSink {
    fn error(&self, line: &str) {
        self.push(Channel::Error, line);
    }

    fn warn(&self, line: &str) {
        self.push(Channel::Warning, line);
    }
}
