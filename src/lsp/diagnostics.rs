//! Conversion from compiler diagnostics to LSP diagnostics

use std::path::Path;

use tower_lsp::lsp_types::{self, DiagnosticSeverity, Position, Range};

use crate::compiler::Diagnostic;

/// Value of the LSP `source` field
pub const DIAGNOSTIC_SOURCE: &str = "chpl";

/// Maps a compiler category to an LSP severity. Unknown categories are errors.
pub fn severity_for(kind: &str) -> DiagnosticSeverity {
    match kind.trim().to_ascii_lowercase().as_str() {
        "warning" => DiagnosticSeverity::WARNING,
        "note" => DiagnosticSeverity::INFORMATION,
        _ => DiagnosticSeverity::ERROR,
    }
}

/// Converts one diagnostic, covering its whole (0-based) line
pub fn to_lsp_diagnostic(diag: &Diagnostic) -> lsp_types::Diagnostic {
    let line = diag.line.saturating_sub(1);
    let message = if diag.message.is_empty() {
        diag.kind.clone()
    } else {
        diag.message.clone()
    };

    lsp_types::Diagnostic {
        range: Range {
            start: Position::new(line, 0),
            end: Position::new(line + 1, 0),
        },
        severity: Some(severity_for(&diag.kind)),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message,
        ..Default::default()
    }
}

/// Converts the diagnostics that belong to `file`, dropping the rest
pub fn diagnostics_for_file(diagnostics: &[Diagnostic], file: &Path) -> Vec<lsp_types::Diagnostic> {
    diagnostics
        .iter()
        .filter(|diag| diag.file == file)
        .map(to_lsp_diagnostic)
        .collect()
}
