//! Running the Chapel compiler as a check-only subprocess

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::compiler::error::CompilerError;
use crate::config::Settings;

/// Flags asking for semantic checks only, with output that does not depend
/// on the local optimization defaults
pub const CHECK_FLAGS: [&str; 2] = ["--no-codegen", "--baseline"];

/// Module search path flag, repeated once per include directory
pub const MODULE_PATH_FLAG: &str = "-M";

/// Where the bundled modules live inside `CHPL_HOME`
pub const STDLIB_MODULES_DIR: &str = "modules";

/// What one compiler run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOutput {
    /// True when the compiler exited with status zero
    pub success: bool,
    /// Everything the compiler wrote to its error channel
    pub stderr: String,
}

impl CompilerOutput {
    pub fn success() -> Self {
        Self {
            success: true,
            stderr: String::new(),
        }
    }

    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stderr: stderr.into(),
        }
    }
}

/// Trait for checking a source file with an external compiler
pub trait Compiler: Send + Sync {
    /// Checks `target` with the given module search directories.
    ///
    /// Blocks until the compiler exits. Returns `Err` only when the compiler
    /// could not be run at all; a failed check is `Ok` with `success == false`.
    fn check(
        &self,
        target: &Path,
        include_paths: &[PathBuf],
    ) -> Result<CompilerOutput, CompilerError>;

    /// Whether `file` belongs to the compiler's own installation
    fn is_stdlib_path(&self, _file: &Path) -> bool {
        false
    }
}

/// Runs the `chpl` executable
#[derive(Debug, Clone)]
pub struct ChplCompiler {
    program: String,
    chpl_home: Option<PathBuf>,
}

impl ChplCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            chpl_home: None,
        }
    }

    /// Exports `CHPL_HOME` to the compiler and treats files under its
    /// `modules` directory as stdlib
    pub fn with_chpl_home(mut self, chpl_home: impl Into<PathBuf>) -> Self {
        self.chpl_home = Some(chpl_home.into());
        self
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let compiler = Self::new(settings.compiler.clone());
        match &settings.chpl_home {
            Some(home) => compiler.with_chpl_home(home),
            None => compiler,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed after the program name
    pub fn command_args(target: &Path, include_paths: &[PathBuf]) -> Vec<OsString> {
        let mut args = Vec::with_capacity(1 + CHECK_FLAGS.len() + include_paths.len() * 2);
        args.push(target.as_os_str().to_os_string());
        args.extend(CHECK_FLAGS.iter().map(OsString::from));
        for path in include_paths {
            args.push(OsString::from(MODULE_PATH_FLAG));
            args.push(path.as_os_str().to_os_string());
        }
        args
    }
}

impl Compiler for ChplCompiler {
    fn check(
        &self,
        target: &Path,
        include_paths: &[PathBuf],
    ) -> Result<CompilerOutput, CompilerError> {
        let args = Self::command_args(target, include_paths);
        debug!("Running {} {:?}", self.program, args);

        let mut command = Command::new(&self.program);
        command.args(&args);
        if let Some(home) = &self.chpl_home {
            command.env("CHPL_HOME", home);
        }

        let output = command.output().map_err(|source| CompilerError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        debug!("{} exited with {}", self.program, output.status);

        Ok(CompilerOutput {
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn is_stdlib_path(&self, file: &Path) -> bool {
        self.chpl_home
            .as_deref()
            .is_some_and(|home| file.starts_with(home.join(STDLIB_MODULES_DIR)))
    }
}
