//! Turns one compiler run into merged diagnostics

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::compiler::error::{CompilerError, LineError};
use crate::compiler::invocation::Compiler;
use crate::compiler::parser::parse_line;
use crate::compiler::types::{Diagnostic, Location};
use crate::log::Logger;

/// Checks `target` and returns one diagnostic per reported `(file, line)`.
///
/// A zero exit status means no diagnostics, whatever was written to stderr.
/// Diagnostics for stdlib files are dropped, except those for `target` itself.
/// Only a failure to run the compiler is returned as `Err`.
pub fn extract(
    compiler: &dyn Compiler,
    target: &Path,
    include_paths: &BTreeSet<PathBuf>,
    logger: &dyn Logger,
) -> Result<Vec<Diagnostic>, CompilerError> {
    let include_paths: Vec<PathBuf> = include_paths.iter().cloned().collect();
    let output = compiler.check(target, &include_paths)?;

    if output.success {
        logger.info(&format!("{:?} checked without errors", target));
        return Ok(Vec::new());
    }

    let diagnostics = parse_output(&output.stderr, logger).filter(|diag| {
        diag.file == target || !(diag.is_in_stdlib() || compiler.is_stdlib_path(&diag.file))
    });
    let merged = merge_by_location(diagnostics);

    logger.info(&format!(
        "{:?} produced {} diagnostics",
        target,
        merged.len()
    ));
    Ok(merged)
}

/// Lazily parses compiler stderr, skipping lines that are not diagnostics.
/// Lines with a malformed line number are reported to `logger`.
pub fn parse_output<'a>(
    stderr: &'a str,
    logger: &'a dyn Logger,
) -> impl Iterator<Item = Diagnostic> + 'a {
    stderr
        .trim()
        .lines()
        .filter_map(move |line| match parse_line(line) {
            Ok(diag) => Some(diag),
            Err(LineError::TooFewFields) => None,
            Err(e @ LineError::InvalidLineNumber(_)) => {
                logger.error(&format!("Skipping compiler line {:?}: {}", line, e));
                None
            }
        })
}

/// Merges diagnostics that share a `(file, line)`.
///
/// Groups keep first-seen order. Each group keeps its first member's kind and
/// location; messages are joined with a space in encounter order.
pub fn merge_by_location(diagnostics: impl IntoIterator<Item = Diagnostic>) -> Vec<Diagnostic> {
    let mut groups: IndexMap<Location, Diagnostic> = IndexMap::new();

    for diag in diagnostics {
        match groups.get_mut(&diag.location()) {
            Some(first) => {
                first.message.push(' ');
                first.message.push_str(&diag.message);
            }
            None => {
                groups.insert(diag.location(), diag);
            }
        }
    }

    groups.into_values().collect()
}
