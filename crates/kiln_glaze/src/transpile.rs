//! Transpiler adapter over oxc.
//!
//! Runs parse, early-error checks, lowering and printing for one source.
//! oxc diagnostics are converted here into [`Diagnostic`] values with their
//! severity and position fixed; nothing downstream looks at oxc types.

use crate::error::{ToolError, ToolResult};
use crate::options::{Language, ToolKind, ToolOptions};
use kiln_ember::{has_errors, Diagnostic, DiagnosticCode};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_diagnostics::{OxcDiagnostic, Severity as OxcSeverity};
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{TransformOptions, Transformer};
use std::path::{Path, PathBuf};

/// Generated code and its source map.
#[derive(Debug, Clone)]
pub struct Emitted {
    pub code: String,
    pub map: Option<EmittedMap>,
}

/// Both encodings of a generated source map.
#[derive(Debug, Clone)]
pub struct EmittedMap {
    /// Source map JSON, for sibling `.map` files.
    pub json: String,
    /// `data:application/json;base64,...` URL, for inline maps.
    pub data_url: String,
}

/// Result of one transpile invocation.
#[derive(Debug, Clone)]
pub struct TranspileOutput {
    /// Every diagnostic produced, in stage order.
    pub diagnostics: Vec<Diagnostic>,
    /// Present only when no error diagnostic was produced.
    pub emitted: Option<Emitted>,
}

impl TranspileOutput {
    #[inline]
    pub fn has_errors(&self) -> bool {
        has_errors(&self.diagnostics)
    }

    fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            emitted: None,
        }
    }
}

/// Build the oxc transform options for a language target.
pub fn transform_options(target: &str) -> ToolResult<TransformOptions> {
    TransformOptions::from_target(target).map_err(|message| ToolError::Target {
        target: target.to_string(),
        message,
    })
}

/// Transpile one source.
///
/// `file_name` labels diagnostics and the source map; `kind` selects the
/// parse goal. An invalid target is the only failure; compile problems are
/// returned as diagnostics.
pub fn transpile(
    file_name: &str,
    source: &str,
    kind: ToolKind,
    options: &ToolOptions,
) -> ToolResult<TranspileOutput> {
    let transform_options = transform_options(&options.target)?;
    let language = Language::from_name(file_name);
    let source_type = SourceType::mjs()
        .with_module(kind.is_module())
        .with_typescript(language.is_typescript());

    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, source_type).parse();

    let mut diagnostics: Vec<Diagnostic> = parsed
        .errors
        .iter()
        .map(|e| convert_diagnostic(e, DiagnosticCode::SYNTAX, file_name))
        .collect();
    if has_errors(&diagnostics) {
        return Ok(TranspileOutput::failed(diagnostics));
    }

    let mut program = parsed.program;

    let semantic_ret = SemanticBuilder::new()
        .with_check_syntax_error(true)
        .build(&program);
    diagnostics.extend(
        semantic_ret
            .errors
            .iter()
            .map(|e| convert_diagnostic(e, DiagnosticCode::SEMANTIC, file_name)),
    );
    if has_errors(&diagnostics) {
        return Ok(TranspileOutput::failed(diagnostics));
    }

    let scoping = semantic_ret.semantic.into_scoping();
    let transform_ret = Transformer::new(&allocator, Path::new(file_name), &transform_options)
        .build_with_scoping(scoping, &mut program);
    diagnostics.extend(
        transform_ret
            .errors
            .iter()
            .map(|e| convert_diagnostic(e, DiagnosticCode::TRANSFORM, file_name)),
    );
    if has_errors(&diagnostics) {
        return Ok(TranspileOutput::failed(diagnostics));
    }

    let codegen_options = CodegenOptions {
        minify: options.minify,
        single_quote: options.single_quote,
        source_map_path: Some(PathBuf::from(file_name)),
        ..CodegenOptions::default()
    };
    let generated = Codegen::new().with_options(codegen_options).build(&program);

    let map = generated.map.map(|map| EmittedMap {
        json: map.to_json_string(),
        data_url: map.to_data_url(),
    });

    Ok(TranspileOutput {
        diagnostics,
        emitted: Some(Emitted {
            code: generated.code,
            map,
        }),
    })
}

fn convert_diagnostic(diag: &OxcDiagnostic, code: DiagnosticCode, file_name: &str) -> Diagnostic {
    let mut converted = match diag.severity {
        OxcSeverity::Error => Diagnostic::error(code, diag.message.to_string()),
        _ => Diagnostic::warning(code, diag.message.to_string()),
    };

    let offset = diag
        .labels
        .as_ref()
        .and_then(|labels| labels.first())
        .map(|label| label.offset() as u32);
    if let Some(offset) = offset {
        converted = converted.at(file_name, offset);
    }

    converted
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_ember::Severity;

    fn run(name: &str, source: &str, kind: ToolKind) -> TranspileOutput {
        transpile(name, source, kind, &ToolOptions::default()).unwrap()
    }

    #[test]
    fn test_valid_script() {
        let out = run("a.js", "let x=1;", ToolKind::Script);
        assert!(out.diagnostics.is_empty());
        let emitted = out.emitted.unwrap();
        assert!(emitted.code.contains("let x = 1"));
        let map = emitted.map.unwrap();
        assert!(map.json.contains("\"mappings\""));
        assert!(map.data_url.starts_with("data:application/json"));
    }

    #[test]
    fn test_module_allows_import() {
        let out = run("b.mjs", "import x from 'y'; export default x;", ToolKind::Module);
        assert!(!out.has_errors());
        assert!(out.emitted.unwrap().code.contains("import x from"));
    }

    #[test]
    fn test_script_rejects_import() {
        let out = run("b.js", "import x from 'y';", ToolKind::Script);
        assert!(out.has_errors());
        assert!(out.emitted.is_none());
    }

    #[test]
    fn test_syntax_error_has_position() {
        let out = run("c.js", "let a = 1;\nlet = ;", ToolKind::Script);
        assert!(out.has_errors());
        assert!(out.emitted.is_none());

        let first = &out.diagnostics[0];
        assert_eq!(first.severity, Severity::Error);
        assert_eq!(first.code, DiagnosticCode::SYNTAX);
        let position = first.position.as_ref().unwrap();
        assert_eq!(position.file, "c.js");
        assert!(position.offset >= 11);
    }

    #[test]
    fn test_semantic_error() {
        let out = run("d.js", "let a = 1;\nlet a = 2;", ToolKind::Script);
        assert!(out.has_errors());
        assert!(out
            .diagnostics
            .iter()
            .any(|d| d.code == DiagnosticCode::SEMANTIC));
    }

    #[test]
    fn test_typescript_types_are_stripped() {
        let out = run(
            "e.ts",
            "interface P { x: number }\nconst p: P = { x: 1 };",
            ToolKind::Script,
        );
        assert!(!out.has_errors());
        let code = out.emitted.unwrap().code;
        assert!(!code.contains("interface"));
        assert!(!code.contains(": P"));
        assert!(code.contains("const p"));
    }

    #[test]
    fn test_invalid_target() {
        let options = ToolOptions::default().with_target("es1999-nonsense");
        let err = transpile("a.js", "1", ToolKind::Script, &options).unwrap_err();
        assert!(matches!(err, ToolError::Target { .. }));
    }
}
