// LSP protocol layer
// - server.rs: stdio server startup
// - backend.rs: LanguageServer trait implementation
// - diagnostics.rs: compiler diagnostics -> LSP diagnostics

pub mod backend;
pub mod diagnostics;
pub mod server;
