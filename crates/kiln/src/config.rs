//! Configuration file loading for kiln.
//!
//! Reads `kiln.config.json` from the project root. Values given on the
//! command line take precedence over the file.

use kiln_glaze::{Newline, SourceMapMode, ToolKind, ToolOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "kiln.config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level kiln configuration.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KilnConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Build configuration.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Configuration shared by `build` and `check`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildConfig {
    /// Output directory, relative to the project root (default: `dist`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Glob patterns selecting sources, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,

    /// Language level to lower to (default: `es2015`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Name suffixes built with the module tool (default: `.mjs`, `.mts`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_suffixes: Option<Vec<String>>,

    /// Source map placement per tool kind.
    #[serde(default)]
    pub source_maps: SourceMapsConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_quote: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newline: Option<Newline>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceMapsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<SourceMapMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<SourceMapMode>,
}

impl BuildConfig {
    /// Tool options for one kind, before command-line overrides.
    pub fn tool_options(&self, kind: ToolKind) -> ToolOptions {
        let defaults = ToolOptions::default();
        let source_map = match kind {
            ToolKind::Module => self.source_maps.module,
            ToolKind::Script => self.source_maps.script,
        };
        ToolOptions {
            target: self.target.clone().unwrap_or(defaults.target),
            source_map: source_map.unwrap_or(defaults.source_map),
            minify: self.minify.unwrap_or(defaults.minify),
            single_quote: self.single_quote.unwrap_or(defaults.single_quote),
            newline: self.newline.unwrap_or(defaults.newline),
        }
    }
}

/// Load `kiln.config.json` from `dir`. A missing file yields the defaults.
pub fn load_config(dir: &Path) -> Result<KilnConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);

    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no {} in {}", CONFIG_FILE, dir.display());
            return Ok(KilnConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path,
                source,
            })
        }
    };

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: config_path,
        source,
    })
}

/// JSON Schema for `kiln.config.json`.
pub const KILN_CONFIG_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Kiln Configuration",
  "description": "Configuration file for kiln - staged JavaScript and TypeScript transpilation",
  "type": "object",
  "properties": {
    "$schema": {
      "type": "string",
      "description": "JSON Schema reference for editor autocompletion"
    },
    "build": {
      "type": "object",
      "description": "Build configuration",
      "properties": {
        "outDir": {
          "type": "string",
          "description": "Output directory relative to the project root",
          "default": "dist"
        },
        "sources": {
          "type": "array",
          "description": "Glob patterns selecting sources relative to the project root",
          "items": { "type": "string" },
          "examples": [["src/**/*.js", "src/**/*.mjs"]]
        },
        "target": {
          "type": "string",
          "description": "Language level to lower to",
          "default": "es2015",
          "examples": ["es2015", "es2020", "esnext"]
        },
        "moduleSuffixes": {
          "type": "array",
          "description": "Name suffixes built as ES modules",
          "items": { "type": "string" },
          "default": [".mjs", ".mts"]
        },
        "sourceMaps": {
          "type": "object",
          "description": "Source map placement per tool kind",
          "properties": {
            "module": { "enum": ["sibling", "inline"], "default": "sibling" },
            "script": { "enum": ["sibling", "inline"], "default": "sibling" }
          },
          "additionalProperties": false
        },
        "minify": {
          "type": "boolean",
          "default": false
        },
        "singleQuote": {
          "type": "boolean",
          "default": false
        },
        "newline": {
          "enum": ["lf", "crlf"],
          "default": "lf"
        }
      },
      "additionalProperties": false
    }
  },
  "additionalProperties": false
}"#;
