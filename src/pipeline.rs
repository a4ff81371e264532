//! One diagnostic run: root -> include paths -> compiler

use std::collections::BTreeSet;
use std::path::Path;

use crate::compiler::{Compiler, CompilerError, Diagnostic, extract};
use crate::log::Logger;
use crate::project::{collect_include_paths, resolve_root};

/// Checks `target` and returns its merged diagnostics.
///
/// `known_root` skips the upward root search when the caller already knows
/// the project root. Without any root the compiler runs with no module
/// search paths. Blocks until the compiler exits.
pub fn diagnose(
    target: &Path,
    known_root: Option<&Path>,
    compiler: &dyn Compiler,
    logger: &dyn Logger,
) -> Result<Vec<Diagnostic>, CompilerError> {
    let include_paths = match resolve_root(target, known_root) {
        Some(root) => {
            logger.info(&format!("Project root for {:?} is {:?}", target, root));
            collect_include_paths(&root, logger)
        }
        None => {
            logger.info(&format!("No project root for {:?}", target));
            BTreeSet::new()
        }
    };

    extract(compiler, target, &include_paths, logger)
}
