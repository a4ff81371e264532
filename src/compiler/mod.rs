// Compiler layer
// - types.rs: Diagnostic and its grouping key
// - error.rs: compiler and line errors
// - parser.rs: one stderr line -> one Diagnostic
// - invocation.rs: Compiler trait and the chpl process runner
// - extractor.rs: run, parse, filter and merge

pub mod error;
pub mod extractor;
pub mod invocation;
pub mod parser;
pub mod types;

pub use error::{CompilerError, LineError};
pub use extractor::extract;
pub use invocation::{ChplCompiler, Compiler, CompilerOutput};
pub use types::{Diagnostic, Location};
