pub mod compiler;
pub mod config;
pub mod log;
pub mod lsp;
pub mod pipeline;
pub mod project;

pub use compiler::types::Diagnostic;
pub use pipeline::diagnose;
