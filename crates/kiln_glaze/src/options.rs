//! Tool kinds and options.

use serde::{Deserialize, Serialize};

/// The kind of source a tool handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// ES module: parsed with the module goal, `import`/`export` allowed.
    Module,
    /// Classic script: parsed with the script goal.
    Script,
}

impl ToolKind {
    /// Human-readable purpose label used in progress output.
    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Module => "transpiling module",
            Self::Script => "transpiling script",
        }
    }

    #[inline]
    pub fn is_module(&self) -> bool {
        matches!(self, Self::Module)
    }
}

/// Where a tool puts the source map of its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapMode {
    /// `<output>.map` next to the output, referenced by a comment
    #[default]
    Sibling,
    /// Base64 data URL embedded in the output
    Inline,
}

/// Line ending of generated files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Newline {
    #[default]
    Lf,
    Crlf,
}

impl Newline {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Compiler configuration captured by a tool at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOptions {
    /// Language level to lower to, e.g. `es2015` or `esnext` (default: es2015)
    #[serde(default = "default_target")]
    pub target: String,

    /// Source map placement (default: Sibling)
    #[serde(default)]
    pub source_map: SourceMapMode,

    /// Minify the generated code (default: false)
    #[serde(default)]
    pub minify: bool,

    /// Print string literals with single quotes (default: false)
    #[serde(default)]
    pub single_quote: bool,

    /// Line ending of generated files (default: Lf)
    #[serde(default)]
    pub newline: Newline,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            target: default_target(),
            source_map: SourceMapMode::default(),
            minify: false,
            single_quote: false,
            newline: Newline::default(),
        }
    }
}

fn default_target() -> String {
    "es2015".to_string()
}

impl ToolOptions {
    #[inline]
    pub fn with_source_map(mut self, mode: SourceMapMode) -> Self {
        self.source_map = mode;
        self
    }

    #[inline]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }
}

/// Source language, decided from the declared file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
}

impl Language {
    pub fn from_name(name: &str) -> Self {
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match ext {
            "ts" | "mts" | "cts" => Self::TypeScript,
            _ => Self::JavaScript,
        }
    }

    #[inline]
    pub fn is_typescript(&self) -> bool {
        matches!(self, Self::TypeScript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(ToolKind::Module.label(), "transpiling module");
        assert_eq!(ToolKind::Script.label(), "transpiling script");
    }

    #[test]
    fn test_language_from_name() {
        assert_eq!(Language::from_name("a.js"), Language::JavaScript);
        assert_eq!(Language::from_name("a.mjs"), Language::JavaScript);
        assert_eq!(Language::from_name("lib/a.ts"), Language::TypeScript);
        assert_eq!(Language::from_name("a.mts"), Language::TypeScript);
        assert_eq!(Language::from_name("noext"), Language::JavaScript);
    }

    #[test]
    fn test_defaults() {
        let options = ToolOptions::default();
        assert_eq!(options.target, "es2015");
        assert_eq!(options.source_map, SourceMapMode::Sibling);
        assert_eq!(options.newline.as_str(), "\n");
    }
}
