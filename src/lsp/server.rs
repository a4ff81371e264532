use std::path::Path;

use tower_lsp::{LspService, Server};
use tracing::info;

use crate::config::Settings;
use crate::log::{LogLevel, init};
use crate::lsp::backend::Backend;

pub async fn run_server(
    settings: Settings,
    log_level: Option<LogLevel>,
    log_path: &Path,
) -> anyhow::Result<()> {
    let _log_guard = init(log_level, log_path)?;

    info!("Starting chapel-lsp server with compiler {:?}", settings.compiler);

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| Backend::new(client, settings));
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("chapel-lsp server stopped");
    Ok(())
}
