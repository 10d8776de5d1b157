use crate::client::LspClient;
use crate::launcher::spawn_language_server;
use lsp_types::notification::{DidChangeTextDocument, DidOpenTextDocument, Exit, Initialized};
use lsp_types::request::{
    DocumentSymbolRequest, GotoDefinition, HoverRequest, Initialize, Shutdown,
};
use lsp_types::{
    ClientCapabilities, ClientInfo, DidChangeTextDocumentParams, DidOpenTextDocumentParams, DocumentSymbolClientCapabilities,
    DocumentSymbolParams, DocumentSymbolResponse, GotoCapability, GotoDefinitionParams,
    GotoDefinitionResponse, Hover, HoverClientCapabilities, HoverParams, InitializeParams,
    InitializedParams, MarkupKind, Position, TextDocumentClientCapabilities,
    TextDocumentContentChangeEvent, TextDocumentIdentifier, TextDocumentItem,
    TextDocumentPositionParams, VersionedTextDocumentIdentifier, WorkspaceClientCapabilities,
    WorkspaceFolder,
};
use lspnav_core::config::LspConfig;
use lspnav_core::error::ProviderError;
use lspnav_core::languages;
use lspnav_query::provider::CodeIntelligenceProvider;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Child;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Code intelligence answered by a language server over stdio.
pub struct LspProvider {
    client: LspClient,
    child: Mutex<Option<Child>>,
    opened: Mutex<HashMap<Url, SyncedDocument>>,
}

impl LspProvider {
    /// Spawn the configured server for `workspace` and complete the handshake.
    pub async fn start(config: &LspConfig, workspace: &Path) -> Result<Self, ProviderError> {
        let root = Url::from_directory_path(workspace).map_err(|_| {
            ProviderError::protocol(format!(
                "workspace `{}` is not an absolute path",
                workspace.display()
            ))
        })?;
        let server = spawn_language_server(config, workspace)?;
        let mut provider = Self::connect(
            server.stdout,
            server.stdin,
            &root,
            Duration::from_millis(config.request_timeout_ms),
            Duration::from_millis(config.startup_timeout_ms),
        )
        .await?;
        provider.child = Mutex::new(Some(server.child));
        Ok(provider)
    }

    /// Complete the handshake over an already-open connection.
    pub async fn connect<R, W>(
        reader: R,
        writer: W,
        root: &Url,
        request_timeout: Duration,
        startup_timeout: Duration,
    ) -> Result<Self, ProviderError>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let client = LspClient::new(reader, writer, request_timeout);
        let result = client
            .request_with_timeout::<Initialize>(initialize_params(root), startup_timeout)
            .await?;
        client.notify::<Initialized>(InitializedParams {}).await?;

        let server = result
            .server_info
            .map(|info| match info.version {
                Some(version) => format!("{} {version}", info.name),
                None => info.name,
            })
            .unwrap_or_else(|| "unknown".to_string());
        info!(root = %root, server = %server, "Language server initialized");

        Ok(Self {
            client,
            child: Mutex::new(None),
            opened: Mutex::new(HashMap::new()),
        })
    }

    /// Send `shutdown` and `exit`, then wait briefly for the process to leave.
    pub async fn shutdown(&self) -> Result<(), ProviderError> {
        if !self.client.is_closed() {
            self.client.request::<Shutdown>(()).await?;
            self.client.notify::<Exit>(()).await?;
        }
        if let Some(mut child) = self.child.lock().await.take() {
            match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
                Ok(status) => debug!(status = ?status.ok(), "Language server exited"),
                Err(_) => {
                    warn!("Language server ignored exit; killing it");
                    child.kill().await?;
                }
            }
        }
        Ok(())
    }

    /// Bring the server's copy of `uri` up to date with the file on disk.
    ///
    /// The first request for a file sends `didOpen`. Later requests re-read the
    /// file and send a full-text `didChange` with a bumped version when it differs
    /// from what the server last received.
    async fn sync_document(&self, uri: &Url) -> Result<(), ProviderError> {
        if uri.scheme() != "file" {
            return Ok(());
        }
        let path = uri
            .to_file_path()
            .map_err(|_| ProviderError::protocol(format!("`{uri}` is not a local file")))?;
        let text = tokio::fs::read_to_string(&path).await?;

        let mut opened = self.opened.lock().await;
        match opened.get_mut(uri) {
            Some(synced) if synced.text == text => Ok(()),
            Some(synced) => {
                let version = synced.version + 1;
                self.client
                    .notify::<DidChangeTextDocument>(DidChangeTextDocumentParams {
                        text_document: VersionedTextDocumentIdentifier::new(uri.clone(), version),
                        content_changes: vec![TextDocumentContentChangeEvent {
                            range: None,
                            range_length: None,
                            text: text.clone(),
                        }],
                    })
                    .await?;
                debug!(uri = %uri, version, "Sent changed document to language server");
                synced.version = version;
                synced.text = text;
                Ok(())
            }
            None => {
                let language_id = languages::language_id_for_path(&path);
                self.client
                    .notify::<DidOpenTextDocument>(DidOpenTextDocumentParams {
                        text_document: TextDocumentItem::new(
                            uri.clone(),
                            language_id.to_string(),
                            0,
                            text.clone(),
                        ),
                    })
                    .await?;
                debug!(uri = %uri, language_id, "Opened document in language server");
                opened.insert(uri.clone(), SyncedDocument { version: 0, text });
                Ok(())
            }
        }
    }
}

/// What the server last received for a document.
struct SyncedDocument {
    version: i32,
    text: String,
}

impl CodeIntelligenceProvider for LspProvider {
    async fn definition(
        &self,
        uri: &Url,
        position: Position,
    ) -> Result<Option<GotoDefinitionResponse>, ProviderError> {
        self.sync_document(uri).await?;
        self.client
            .request::<GotoDefinition>(GotoDefinitionParams {
                text_document_position_params: position_params(uri, position),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
    }

    async fn hover(&self, uri: &Url, position: Position) -> Result<Vec<Hover>, ProviderError> {
        self.sync_document(uri).await?;
        let hover = self
            .client
            .request::<HoverRequest>(HoverParams {
                text_document_position_params: position_params(uri, position),
                work_done_progress_params: Default::default(),
            })
            .await?;
        Ok(hover.into_iter().collect())
    }

    async fn document_symbols(
        &self,
        uri: &Url,
    ) -> Result<Option<DocumentSymbolResponse>, ProviderError> {
        self.sync_document(uri).await?;
        self.client
            .request::<DocumentSymbolRequest>(DocumentSymbolParams {
                text_document: TextDocumentIdentifier::new(uri.clone()),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
    }
}

fn position_params(uri: &Url, position: Position) -> TextDocumentPositionParams {
    TextDocumentPositionParams::new(TextDocumentIdentifier::new(uri.clone()), position)
}

#[allow(deprecated)]
fn initialize_params(root: &Url) -> InitializeParams {
    let name = root
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .unwrap_or("workspace")
        .to_string();
    InitializeParams {
        process_id: Some(std::process::id()),
        root_uri: Some(root.clone()),
        workspace_folders: Some(vec![WorkspaceFolder {
            uri: root.clone(),
            name,
        }]),
        client_info: Some(ClientInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
        capabilities: client_capabilities(),
        ..Default::default()
    }
}

fn client_capabilities() -> ClientCapabilities {
    ClientCapabilities {
        workspace: Some(WorkspaceClientCapabilities {
            configuration: Some(true),
            workspace_folders: Some(true),
            ..Default::default()
        }),
        text_document: Some(TextDocumentClientCapabilities {
            document_symbol: Some(DocumentSymbolClientCapabilities {
                hierarchical_document_symbol_support: Some(true),
                ..Default::default()
            }),
            definition: Some(GotoCapability {
                dynamic_registration: None,
                link_support: Some(true),
            }),
            hover: Some(HoverClientCapabilities {
                dynamic_registration: None,
                content_format: Some(vec![MarkupKind::Markdown, MarkupKind::PlainText]),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
