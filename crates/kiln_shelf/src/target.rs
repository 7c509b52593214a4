//! Build targets.

use kiln_ember::DiagnosticReporter;
use kiln_glaze::{Tool, ToolInput, ToolOutcome, ToolResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One output file produced from its inputs by a tool.
///
/// Registering a target does not build it; [`Target::build`] runs the tool.
#[derive(Debug, Clone)]
pub struct Target {
    name: String,
    output: PathBuf,
    inputs: Vec<ToolInput>,
    tool: Arc<Tool>,
}

impl Target {
    pub fn new(
        name: impl Into<String>,
        output: impl Into<PathBuf>,
        inputs: Vec<ToolInput>,
        tool: Arc<Tool>,
    ) -> Self {
        Self {
            name: name.into(),
            output: output.into(),
            inputs,
            tool,
        }
    }

    /// Declared source name, kept for labeling.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute output path.
    #[inline]
    pub fn output(&self) -> &Path {
        &self.output
    }

    #[inline]
    pub fn inputs(&self) -> &[ToolInput] {
        &self.inputs
    }

    #[inline]
    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Run the tool for this target.
    pub fn build(&self, reporter: &DiagnosticReporter) -> ToolResult<ToolOutcome> {
        self.tool
            .invoke(&self.output, &self.inputs, &self.name, reporter)
    }
}
