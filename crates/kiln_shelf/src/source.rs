//! Sources handed to the stager.

use kiln_glaze::ToolInput;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An input unit: a declared name plus its content.
///
/// `name` is relative and uses forward slashes; it decides the output path
/// and the tool. Content is either held in memory or read from disk when
/// the target builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    name: String,
    input: ToolInput,
}

impl Source {
    /// A source whose text is already in memory.
    pub fn text(name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            input: ToolInput::text(content),
        }
    }

    /// A source backed by a file anywhere on disk.
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            input: ToolInput::file(path),
        }
    }

    /// A source at `root/<name>`.
    pub fn in_root(root: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = root.join(&name);
        Self::file(name, path)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn input(&self) -> &ToolInput {
        &self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_root() {
        let source = Source::in_root(Path::new("/project"), "src/a.js");
        assert_eq!(source.name(), "src/a.js");
        assert_eq!(
            source.input().path(),
            Some(Path::new("/project/src/a.js"))
        );
    }

    #[test]
    fn test_text() {
        let source = Source::text("a.js", "let x = 1;");
        assert!(source.input().path().is_none());
    }
}
