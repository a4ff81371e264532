//! Shared helpers for driving the server through `tower::Service`

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower_lsp::ClientSocket;
use tower_lsp::jsonrpc::Request;
use tower_lsp::lsp_types::Url;

pub fn file_url(path: &Path) -> Url {
    Url::from_file_path(path).unwrap()
}

pub fn create_initialize_request(id: i64, initialization_options: Value) -> Request {
    Request::build("initialize")
        .id(id)
        .params(json!({
            "capabilities": {},
            "initializationOptions": initialization_options,
        }))
        .finish()
}

pub fn create_initialize_request_with_folders(
    id: i64,
    initialization_options: Value,
    folders: &[&Path],
) -> Request {
    let folders: Vec<Value> = folders
        .iter()
        .map(|folder| json!({ "uri": file_url(folder), "name": "workspace" }))
        .collect();

    Request::build("initialize")
        .id(id)
        .params(json!({
            "capabilities": {},
            "initializationOptions": initialization_options,
            "workspaceFolders": folders,
        }))
        .finish()
}

pub fn create_initialized_notification() -> Request {
    Request::build("initialized").params(json!({})).finish()
}

pub fn create_did_save_notification(path: &Path) -> Request {
    Request::build("textDocument/didSave")
        .params(json!({ "textDocument": { "uri": file_url(path) } }))
        .finish()
}

pub fn create_did_close_notification(path: &Path) -> Request {
    Request::build("textDocument/didClose")
        .params(json!({ "textDocument": { "uri": file_url(path) } }))
        .finish()
}

pub fn create_did_change_configuration_notification(settings: Value) -> Request {
    Request::build("workspace/didChangeConfiguration")
        .params(json!({ "settings": settings }))
        .finish()
}

/// Forwards everything the server sends to the client into a channel
pub fn spawn_notification_collector(mut socket: ClientSocket) -> mpsc::UnboundedReceiver<Request> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(request) = socket.next().await {
            if tx.send(request).is_err() {
                break;
            }
        }
    });
    rx
}

/// Waits for the next message with `method`, skipping others
pub async fn wait_for_notification(
    rx: &mut mpsc::UnboundedReceiver<Request>,
    method: &str,
) -> Option<Request> {
    wait_for(rx, |request| request.method() == method).await
}

/// Waits for a `window/logMessage` of the given type whose text contains `needle`
pub async fn wait_for_log_message(
    rx: &mut mpsc::UnboundedReceiver<Request>,
    message_type: i64,
    needle: &str,
) -> Option<Request> {
    wait_for(rx, |request| {
        request.method() == "window/logMessage"
            && request.params().is_some_and(|params| {
                params["type"] == json!(message_type)
                    && params["message"]
                        .as_str()
                        .is_some_and(|message| message.contains(needle))
            })
    })
    .await
}

async fn wait_for(
    rx: &mut mpsc::UnboundedReceiver<Request>,
    matches: impl Fn(&Request) -> bool,
) -> Option<Request> {
    tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(request) = rx.recv().await {
            if matches(&request) {
                return Some(request);
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}
