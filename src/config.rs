use std::path::PathBuf;

use serde::Deserialize;

/// Project-local file listing extra module search directories, one per line.
/// Its presence also marks the project root.
pub const MANIFEST_FILE: &str = ".chapel_lsp";

/// Mason package manifest; its presence marks the project root.
pub const PACKAGE_MANIFEST_FILE: &str = "Mason.toml";

/// Version-control directory that bounds the upward root search.
pub const VCS_MARKER: &str = ".git";

/// Conventional source directory scanned for module search paths
pub const SOURCE_DIR: &str = "src";

/// Extension of Chapel source files
pub const SOURCE_EXTENSION: &str = "chpl";

/// Default compiler executable, looked up on PATH
pub const DEFAULT_COMPILER: &str = "chpl";

/// How the compiler spells paths inside its own installation
pub const STDLIB_MARKER: &str = "$CHPL_HOME";

/// Returns the path to the data directory for chapel-lsp.
/// Uses $XDG_DATA_HOME/chapel-lsp if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/chapel-lsp,
/// or ./chapel-lsp if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("chapel-lsp.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("chapel-lsp")
}

/// Compiler settings used for every diagnostic run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Compiler executable name or path
    pub compiler: String,
    /// Chapel installation directory, exported to the compiler as CHPL_HOME
    pub chpl_home: Option<PathBuf>,
}

impl Settings {
    /// Settings from the process environment, with an optional compiler override
    pub fn from_env(compiler: Option<String>) -> Self {
        Self {
            compiler: compiler.unwrap_or_else(|| DEFAULT_COMPILER.to_string()),
            chpl_home: std::env::var_os("CHPL_HOME")
                .filter(|home| !home.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Applies the fields present in `overrides`, keeping the rest
    pub fn apply(&mut self, overrides: SettingsOverride) {
        if let Some(compiler) = overrides.compiler.filter(|c| !c.trim().is_empty()) {
            self.compiler = compiler;
        }
        if let Some(chpl_home) = overrides.chpl_home {
            self.chpl_home = Some(chpl_home);
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compiler: DEFAULT_COMPILER.to_string(),
            chpl_home: None,
        }
    }
}

/// Partial settings sent by the editor in `initializationOptions` or
/// `workspace/didChangeConfiguration`
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsOverride {
    pub compiler: Option<String>,
    pub chpl_home: Option<PathBuf>,
}

impl SettingsOverride {
    /// Reads an override from an editor payload.
    /// Accepts both `{"chapel": {...}}` and the bare object.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let section = value.get("chapel").unwrap_or(value);
        serde_json::from_value(section.clone())
    }
}
