use std::path::PathBuf;

use clap::Parser;

use chapel_lsp::config::{self, Settings};
use chapel_lsp::log::LogLevel;
use chapel_lsp::lsp::server::run_server;

/// Language server that reports Chapel compiler errors as diagnostics
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Compiler executable to run on save
    #[arg(long, value_name = "PATH")]
    compiler: Option<String>,

    /// Log verbosity; defaults to RUST_LOG, then info
    #[arg(long, value_enum)]
    logging: Option<LogLevel>,

    /// Log file location
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Communicate over stdio (the only supported transport)
    #[arg(long)]
    stdio: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        compiler,
        logging,
        log_file,
        stdio: _,
    } = Cli::parse();

    let settings = Settings::from_env(compiler);
    let log_path = log_file.unwrap_or_else(config::log_path);

    run_server(settings, logging, &log_path).await
}
