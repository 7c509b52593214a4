//! Build fingerprints.
//!
//! A fingerprint identifies everything that went into a successful build of
//! one target: the tool kind, the tool options, the declared name and the
//! input text. A target whose fingerprint is unchanged and whose output
//! still exists is up to date.

use crate::target::Target;
use kiln_glaze::ToolResult;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::Xxh3;

/// Compute the fingerprint of a target by reading its inputs.
pub fn fingerprint(target: &Target) -> ToolResult<u64> {
    let mut hasher = Xxh3::new();
    target.tool().kind().hash(&mut hasher);
    target.tool().options().hash(&mut hasher);
    target.name().hash(&mut hasher);
    for input in target.inputs() {
        let text = input.read()?;
        hasher.update(text.as_bytes());
        hasher.update(&[0xff]);
    }
    Ok(hasher.finish())
}

/// Fingerprints of the last successful build, keyed by output path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprints {
    entries: BTreeMap<PathBuf, u64>,
}

impl Fingerprints {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, output: &Path) -> Option<u64> {
        self.entries.get(output).copied()
    }

    #[inline]
    pub fn insert(&mut self, output: PathBuf, fingerprint: u64) {
        self.entries.insert(output, fingerprint);
    }

    #[inline]
    pub fn remove(&mut self, output: &Path) {
        self.entries.remove(output);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a manifest written by [`Fingerprints::save`].
    ///
    /// A missing or unreadable manifest yields an empty set, which only
    /// means every target is rebuilt.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("failed to read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let raw: BTreeMap<String, String> = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("failed to parse {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let entries = raw
            .into_iter()
            .filter_map(|(output, hex)| {
                u64::from_str_radix(&hex, 16)
                    .ok()
                    .map(|fp| (PathBuf::from(output), fp))
            })
            .collect();
        Self { entries }
    }

    /// Persist the set as JSON.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let raw: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|(output, fp)| (output.to_string_lossy().into_owned(), format!("{:016x}", fp)))
            .collect();
        let json = serde_json::to_string_pretty(&raw).map_err(std::io::Error::other)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
    }
}
