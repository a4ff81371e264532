use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, error, info, warn};

use crate::compiler::ChplCompiler;
use crate::config::{Settings, SettingsOverride};
use crate::log::TracingLogger;
use crate::lsp::diagnostics::diagnostics_for_file;
use crate::pipeline::diagnose;
use crate::project::resolve_root;

pub struct Backend {
    client: Client,
    settings: RwLock<Settings>,
    workspace_folders: RwLock<Vec<PathBuf>>,
}

impl Backend {
    pub fn new(client: Client, settings: Settings) -> Self {
        Self {
            client,
            settings: RwLock::new(settings),
            workspace_folders: RwLock::new(Vec::new()),
        }
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::INCREMENTAL),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(false),
                    })),
                    ..Default::default()
                },
            )),
            workspace: Some(WorkspaceServerCapabilities {
                workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                    supported: Some(true),
                    change_notifications: Some(OneOf::Left(true)),
                }),
                file_operations: None,
            }),
            ..Default::default()
        }
    }

    async fn apply_settings(&self, value: &serde_json::Value) {
        match SettingsOverride::from_value(value) {
            Ok(overrides) => {
                let mut settings = self.settings.write().await;
                settings.apply(overrides);
                info!("Settings updated: {:?}", *settings);
            }
            Err(e) => {
                warn!("Ignoring malformed settings {}: {}", value, e);
            }
        }
    }

    /// Innermost workspace folder containing `path`.
    ///
    /// Only used when no marker is found above `path`, so nested projects
    /// inside a folder keep their own root.
    async fn known_root_for(&self, path: &Path) -> Option<PathBuf> {
        self.workspace_folders
            .read()
            .await
            .iter()
            .filter(|folder| path.starts_with(folder))
            .max_by_key(|folder| folder.components().count())
            .cloned()
    }

    async fn check_document(&self, uri: Url) {
        let Ok(path) = uri.to_file_path() else {
            warn!("Skipping diagnostics for non-file URI {}", uri);
            return;
        };

        let settings = self.settings.read().await.clone();
        let known_root = self.known_root_for(&path).await;
        let target = path.clone();

        let result = tokio::task::spawn_blocking(move || {
            let compiler = ChplCompiler::from_settings(&settings);
            let root = resolve_root(&target, None).or(known_root);
            diagnose(&target, root.as_deref(), &compiler, &TracingLogger)
        })
        .await;

        let diagnostics = match result {
            Ok(Ok(diagnostics)) => diagnostics,
            Ok(Err(e)) => {
                error!("Diagnostics for {} failed: {}", uri, e);
                self.client
                    .log_message(
                        MessageType::ERROR,
                        format!("chapel-lsp: cannot check {}: {}", uri, e),
                    )
                    .await;
                return;
            }
            Err(e) => {
                error!("Diagnostic task for {} panicked: {}", uri, e);
                return;
            }
        };

        let published = diagnostics_for_file(&diagnostics, &path);
        let skipped = diagnostics.len() - published.len();
        if skipped > 0 {
            debug!("Dropped {} diagnostics for other files than {:?}", skipped, path);
        }

        self.client
            .log_message(
                MessageType::LOG,
                format!("Publishing {} diagnostics for {}", published.len(), uri),
            )
            .await;

        self.client.publish_diagnostics(uri, published, None).await;
    }
}

#[allow(deprecated)]
fn workspace_roots(params: &InitializeParams) -> Vec<PathBuf> {
    match &params.workspace_folders {
        Some(folders) => folders
            .iter()
            .filter_map(|folder| folder.uri.to_file_path().ok())
            .collect(),
        None => params
            .root_uri
            .iter()
            .filter_map(|uri| uri.to_file_path().ok())
            .collect(),
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        self.client
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;

        if let Some(options) = &params.initialization_options {
            self.apply_settings(options).await;
        }
        *self.workspace_folders.write().await = workspace_roots(&params);

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "chapel-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.client
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        Ok(())
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        let mut folders = self.workspace_folders.write().await;
        for removed in &params.event.removed {
            if let Ok(path) = removed.uri.to_file_path() {
                folders.retain(|folder| folder != &path);
            }
        }
        for added in &params.event.added {
            if let Ok(path) = added.uri.to_file_path() {
                if !folders.contains(&path) {
                    folders.push(path);
                }
            }
        }
        info!("Workspace folders: {:?}", *folders);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.apply_settings(&params.settings).await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        debug!("Document opened: {}", params.text_document.uri);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        debug!("Document changed: {}", params.text_document.uri);
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.client
            .log_message(
                MessageType::LOG,
                format!("Document saved: {}", params.text_document.uri),
            )
            .await;
        self.check_document(params.text_document.uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.client
            .publish_diagnostics(params.text_document.uri, Vec::new(), None)
            .await;
    }
}
