//! Common types for compiler diagnostics

use std::path::PathBuf;

/// One compiler-reported issue at a file and line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category as reported by the compiler (e.g., "error", "warning")
    pub kind: String,
    /// Source file the issue refers to
    pub file: PathBuf,
    /// 1-based line number within `file`
    pub line: u32,
    /// Free-text description, possibly several compiler lines joined by spaces
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        kind: impl Into<String>,
        file: impl Into<PathBuf>,
        line: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn location(&self) -> Location {
        Location {
            file: self.file.clone(),
            line: self.line,
        }
    }

    /// True when the compiler reported the file relative to its own installation
    pub fn is_in_stdlib(&self) -> bool {
        self.file
            .to_string_lossy()
            .starts_with(crate::config::STDLIB_MARKER)
    }
}

/// Grouping key: diagnostics at the same file and line are merged
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: PathBuf,
    pub line: u32,
}
