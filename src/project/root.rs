//! Upward search for the directory that scopes a file's module search paths

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::config::{MANIFEST_FILE, PACKAGE_MANIFEST_FILE, VCS_MARKER};

/// What a directory's immediate children say about it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    /// Contains a manifest or package manifest
    Root,
    /// Contains only the version-control marker; the search stops here
    Boundary,
    None,
}

fn classify(dir: &Path) -> Marker {
    let has = |name: &str| dir.join(name).exists();

    if has(MANIFEST_FILE) || has(PACKAGE_MANIFEST_FILE) {
        Marker::Root
    } else if has(VCS_MARKER) {
        Marker::Boundary
    } else {
        Marker::None
    }
}

/// Finds the project root for `target`.
///
/// A `known_root` supplied by the caller is returned as is. Otherwise the
/// search starts at the parent of `target` and walks up until a directory
/// holds `.chapel_lsp` or `Mason.toml`. A directory holding only `.git` ends
/// the search without a root, as does reaching the filesystem root. A
/// relative `target` is taken relative to the working directory.
pub fn resolve_root(target: &Path, known_root: Option<&Path>) -> Option<PathBuf> {
    if let Some(root) = known_root {
        debug!("Using known root {:?}", root);
        return Some(root.to_path_buf());
    }

    if target.is_absolute() {
        return search_upward(target);
    }

    match std::env::current_dir() {
        Ok(cwd) => search_upward(&anchor(target, &cwd)),
        Err(e) => {
            debug!("Cannot resolve {:?} without a working directory: {}", target, e);
            None
        }
    }
}

/// Joins a relative `target` onto `cwd`, folding `.` and `..` lexically
fn anchor(target: &Path, cwd: &Path) -> PathBuf {
    let mut anchored = PathBuf::new();
    for component in cwd.join(target).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                anchored.pop();
            }
            other => anchored.push(other),
        }
    }
    anchored
}

fn search_upward(target: &Path) -> Option<PathBuf> {
    let start = target.parent()?;

    for dir in start.ancestors() {
        match classify(dir) {
            Marker::Root => {
                debug!("Found project root {:?}", dir);
                return Some(dir.to_path_buf());
            }
            Marker::Boundary => {
                debug!("Stopped root search at repository boundary {:?}", dir);
                return None;
            }
            Marker::None => {}
        }
    }

    None
}
