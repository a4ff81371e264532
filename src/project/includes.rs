//! Module search paths for a project root
//!
//! Two sources are unioned:
//! - entries listed in the `.chapel_lsp` manifest, relative to the root
//! - every directory under `src/` that directly holds a `.chpl` file

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{MANIFEST_FILE, SOURCE_DIR, SOURCE_EXTENSION};
use crate::log::Logger;

/// Collects the module search directories for `root`
pub fn collect_include_paths(root: &Path, logger: &dyn Logger) -> BTreeSet<PathBuf> {
    let mut paths = manifest_entries(root, logger);
    paths.extend(source_directories(root, logger));
    logger.info(&format!(
        "Collected {} include paths under {:?}",
        paths.len(),
        root
    ));
    paths
}

/// Reads `<root>/.chapel_lsp`. A missing manifest yields no entries.
pub fn manifest_entries(root: &Path, logger: &dyn Logger) -> BTreeSet<PathBuf> {
    let manifest_path = root.join(MANIFEST_FILE);
    let text = match std::fs::read_to_string(&manifest_path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return BTreeSet::new(),
        Err(e) => {
            logger.error(&format!("Failed to read {:?}: {}", manifest_path, e));
            return BTreeSet::new();
        }
    };

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| root.join(normalize(Path::new(line))))
        .collect()
}

/// Directories under `<root>/src` that directly contain a source file.
/// Every subdirectory is visited whether or not its parent qualified.
pub fn source_directories(root: &Path, logger: &dyn Logger) -> BTreeSet<PathBuf> {
    let source_root = root.join(SOURCE_DIR);
    if !source_root.is_dir() {
        return BTreeSet::new();
    }

    let mut dirs = BTreeSet::new();
    for entry in WalkDir::new(&source_root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                logger.error(&format!("Skipping unreadable entry: {}", e));
                continue;
            }
        };

        let path = entry.path();
        let is_source = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == SOURCE_EXTENSION);
        if !is_source {
            continue;
        }
        if let Some(parent) = path.parent() {
            dirs.insert(parent.to_path_buf());
        }
    }
    dirs
}

/// Drops `.` components and trailing separators so equal directories compare equal
fn normalize(relative: &Path) -> PathBuf {
    relative
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MockLogger;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_logger() -> MockLogger {
        let mut logger = MockLogger::new();
        logger.expect_info().return_const(());
        logger.expect_error().never();
        logger
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn collects_manifest_entry_and_qualifying_source_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(MANIFEST_FILE), "vendor/lib\n").unwrap();
        touch(&root.join("src/a/A.chpl"));
        touch(&root.join("src/a/notes.txt"));
        touch(&root.join("src/b/B.chpl"));
        touch(&root.join("src/c/readme.md"));

        let paths = collect_include_paths(root, &quiet_logger());

        let expected: BTreeSet<PathBuf> = [
            root.join("vendor/lib"),
            root.join("src/a"),
            root.join("src/b"),
        ]
        .into_iter()
        .collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn duplicates_across_sources_collapse() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(MANIFEST_FILE), "./src/a/\nsrc/a\n").unwrap();
        touch(&root.join("src/a/A.chpl"));

        let paths = collect_include_paths(root, &quiet_logger());

        assert_eq!(paths.len(), 1);
        assert!(paths.contains(&root.join("src/a")));
    }

    #[test]
    fn manifest_lines_are_trimmed_and_blank_lines_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(MANIFEST_FILE), "  lib/one  \n\n\t\nlib/two\r\n").unwrap();

        let entries = manifest_entries(root, &quiet_logger());

        let expected: BTreeSet<PathBuf> = [root.join("lib/one"), root.join("lib/two")]
            .into_iter()
            .collect();
        assert_eq!(entries, expected);
    }

    #[test]
    fn missing_manifest_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();

        assert!(manifest_entries(temp_dir.path(), &quiet_logger()).is_empty());
    }

    #[test]
    fn missing_source_dir_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();

        assert!(source_directories(temp_dir.path(), &quiet_logger()).is_empty());
    }

    #[test]
    fn descends_through_directories_without_sources() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("src/Main.chpl"));
        touch(&root.join("src/empty/deep/Deep.chpl"));

        let dirs = source_directories(root, &quiet_logger());

        let expected: BTreeSet<PathBuf> = [root.join("src"), root.join("src/empty/deep")]
            .into_iter()
            .collect();
        assert_eq!(dirs, expected);
    }

    #[test]
    fn unreadable_manifest_is_logged() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        // A directory in place of the manifest cannot be read as text
        fs::create_dir(root.join(MANIFEST_FILE)).unwrap();

        let mut logger = MockLogger::new();
        logger.expect_error().times(1).return_const(());

        assert!(manifest_entries(root, &logger).is_empty());
    }
}
