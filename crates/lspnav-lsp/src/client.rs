//! Minimal JSON-RPC client for a language server.
//!
//! A background task owns the read half of the connection. It routes responses to
//! waiting requests and answers requests the server sends to us, so a server that
//! asks for configuration never stalls. When the stream ends every pending request
//! fails with [`ProviderError::ServerExited`].

use crate::framing::{read_message, write_message};
use lsp_types::notification::Notification;
use lsp_types::NumberOrString;
use lsp_types::request::Request;
use lspnav_core::error::ProviderError;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;
type ResponseSender = oneshot::Sender<Result<Value, ResponseError>>;
type PendingMap = Arc<Mutex<HashMap<i64, ResponseSender>>>;

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ResponseError>,
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    code: i64,
    message: String,
}

pub struct LspClient {
    writer: Arc<tokio::sync::Mutex<BoxedWriter>>,
    pending: PendingMap,
    next_id: AtomicI64,
    closed: Arc<AtomicBool>,
    request_timeout: Duration,
    reader_task: JoinHandle<()>,
}

impl LspClient {
    /// Start a client over an established connection.
    pub fn new<R, W>(reader: R, writer: W, request_timeout: Duration) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let writer: Arc<tokio::sync::Mutex<BoxedWriter>> =
            Arc::new(tokio::sync::Mutex::new(Box::new(writer)));
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let closed = Arc::new(AtomicBool::new(false));

        let reader_task = tokio::spawn(read_loop(
            BufReader::new(reader),
            Arc::clone(&writer),
            Arc::clone(&pending),
            Arc::clone(&closed),
        ));

        Self {
            writer,
            pending,
            next_id: AtomicI64::new(1),
            closed,
            request_timeout,
            reader_task,
        }
    }

    /// Whether the server side of the connection has gone away.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Send a typed request with the default timeout.
    pub async fn request<R>(&self, params: R::Params) -> Result<R::Result, ProviderError>
    where
        R: Request,
    {
        self.request_with_timeout::<R>(params, self.request_timeout)
            .await
    }

    /// Send a typed request, failing with [`ProviderError::Timeout`] after `timeout`.
    pub async fn request_with_timeout<R>(
        &self,
        params: R::Params,
        timeout: Duration,
    ) -> Result<R::Result, ProviderError>
    where
        R: Request,
    {
        if self.is_closed() {
            return Err(ProviderError::ServerExited);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let params = serde_json::to_value(params).map_err(ProviderError::protocol)?;
        let (tx, rx) = oneshot::channel();
        lock_pending(&self.pending).insert(id, tx);
        if self.is_closed() {
            lock_pending(&self.pending).remove(&id);
            return Err(ProviderError::ServerExited);
        }

        trace!(id, method = R::METHOD, "Sending request");
        if let Err(e) = self.send(message(Some(id), R::METHOD, params)).await {
            lock_pending(&self.pending).remove(&id);
            return Err(e);
        }

        let value = match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(Ok(value))) => value,
            Ok(Ok(Err(error))) => {
                return Err(ProviderError::request(R::METHOD, error.code, error.message));
            }
            // Sender dropped: the reader task saw the stream end.
            Ok(Err(_)) => return Err(ProviderError::ServerExited),
            Err(_) => {
                lock_pending(&self.pending).remove(&id);
                // Best effort; the server may already be gone.
                let _ = self
                    .notify::<lsp_types::notification::Cancel>(lsp_types::CancelParams {
                        id: request_id(id),
                    })
                    .await;
                return Err(ProviderError::timeout(
                    R::METHOD,
                    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                ));
            }
        };

        serde_json::from_value(value).map_err(|e| {
            ProviderError::protocol(format!("unexpected {} result: {e}", R::METHOD))
        })
    }

    /// Send a typed notification.
    pub async fn notify<N>(&self, params: N::Params) -> Result<(), ProviderError>
    where
        N: Notification,
    {
        if self.is_closed() {
            return Err(ProviderError::ServerExited);
        }
        let params = serde_json::to_value(params).map_err(ProviderError::protocol)?;
        trace!(method = N::METHOD, "Sending notification");
        self.send(message(None, N::METHOD, params)).await
    }

    async fn send(&self, message: Value) -> Result<(), ProviderError> {
        let mut writer = self.writer.lock().await;
        write_message(&mut *writer, &message).await
    }
}

impl Drop for LspClient {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

fn message(id: Option<i64>, method: &str, params: Value) -> Value {
    let mut message = json!({ "jsonrpc": "2.0", "method": method });
    if let Some(id) = id {
        message["id"] = json!(id);
    }
    if !params.is_null() {
        message["params"] = params;
    }
    message
}

fn request_id(id: i64) -> NumberOrString {
    i32::try_from(id)
        .map(NumberOrString::Number)
        .unwrap_or_else(|_| NumberOrString::String(id.to_string()))
}

fn lock_pending(
    pending: &PendingMap,
) -> std::sync::MutexGuard<'_, HashMap<i64, ResponseSender>> {
    pending
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn read_loop<R>(
    mut reader: BufReader<R>,
    writer: Arc<tokio::sync::Mutex<BoxedWriter>>,
    pending: PendingMap,
    closed: Arc<AtomicBool>,
) where
    R: AsyncRead + Unpin,
{
    loop {
        match read_message(&mut reader).await {
            Ok(Some(raw)) => dispatch(raw, &writer, &pending).await,
            Ok(None) => {
                debug!("Language server closed its output stream");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read from language server");
                break;
            }
        }
    }

    closed.store(true, Ordering::SeqCst);
    // Dropping the senders wakes every waiter with `ServerExited`.
    lock_pending(&pending).clear();
}

async fn dispatch(
    raw: Value,
    writer: &tokio::sync::Mutex<BoxedWriter>,
    pending: &PendingMap,
) {
    let incoming: IncomingMessage = match serde_json::from_value(raw) {
        Ok(incoming) => incoming,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed message from language server");
            return;
        }
    };

    match (incoming.id, incoming.method) {
        (Some(id), Some(method)) => {
            let result = server_request_result(&method, incoming.params.as_ref());
            debug!(method = %method, "Answering server request");
            let reply = json!({ "jsonrpc": "2.0", "id": id, "result": result });
            let mut writer = writer.lock().await;
            if let Err(e) = write_message(&mut *writer, &reply).await {
                warn!(method = %method, error = %e, "Failed to answer server request");
            }
        }
        (None, Some(method)) => {
            trace!(method = %method, "Server notification");
        }
        (Some(id), None) => {
            let Some(id) = id.as_i64() else {
                warn!(id = %id, "Response with unexpected id");
                return;
            };
            let Some(tx) = lock_pending(pending).remove(&id) else {
                debug!(id, "Response for unknown or cancelled request");
                return;
            };
            let outcome = match incoming.error {
                Some(error) => Err(error),
                None => Ok(incoming.result.unwrap_or(Value::Null)),
            };
            let _ = tx.send(outcome);
        }
        (None, None) => warn!("Ignoring message without id or method"),
    }
}

/// Result we send back for a request initiated by the server.
fn server_request_result(method: &str, params: Option<&Value>) -> Value {
    match method {
        "workspace/configuration" => {
            let items = params
                .and_then(|p| p.get("items"))
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            Value::Array(vec![Value::Null; items])
        }
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_requests_get_one_null_per_item() {
        let params = json!({"items": [{"section": "rust-analyzer"}, {"section": "files"}]});
        assert_eq!(
            server_request_result("workspace/configuration", Some(&params)),
            json!([null, null])
        );
        assert_eq!(
            server_request_result("client/registerCapability", None),
            Value::Null
        );
    }

    #[tokio::test]
    async fn unreadable_frame_fails_pending_requests_as_server_exited() {
        let (client_side, server_side) = tokio::io::duplex(1024);
        let (client_read, client_write) = tokio::io::split(client_side);
        let (_server_read, mut server_write) = tokio::io::split(server_side);
        let client = LspClient::new(client_read, client_write, Duration::from_secs(5));

        let request = client.request::<lsp_types::request::Shutdown>(());
        let garbage = async {
            tokio::io::AsyncWriteExt::write_all(
                &mut server_write,
                b"Content-Length: 18446744073709551615\r\n\r\n",
            )
            .await
            .unwrap();
        };
        let (result, ()) = tokio::join!(request, garbage);
        assert!(matches!(result, Err(ProviderError::ServerExited)));
        assert!(client.is_closed());
    }

    #[test]
    fn null_params_are_omitted() {
        let m = message(Some(4), "shutdown", Value::Null);
        assert_eq!(m, json!({"jsonrpc": "2.0", "id": 4, "method": "shutdown"}));
        let n = message(None, "exit", Value::Null);
        assert!(n.get("id").is_none());
    }
}
