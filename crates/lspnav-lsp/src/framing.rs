//! `Content-Length` framed JSON-RPC messages over byte streams.

use lspnav_core::constants::MAX_MESSAGE_BYTES;
use lspnav_core::error::ProviderError;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const CONTENT_LENGTH: &str = "content-length";

/// Read one framed message. Returns `Ok(None)` on a clean end of stream.
pub async fn read_message<R>(reader: &mut R) -> Result<Option<Value>, ProviderError>
where
    R: AsyncBufRead + Unpin,
{
    let mut content_length: Option<usize> = None;
    let mut saw_header = false;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            if saw_header {
                return Err(ProviderError::protocol("stream ended inside message headers"));
            }
            return Ok(None);
        }
        let header = line.trim_end_matches(['\r', '\n']);
        if header.is_empty() {
            if saw_header {
                break;
            }
            // Tolerate stray blank lines between messages.
            continue;
        }
        saw_header = true;

        let Some((name, value)) = header.split_once(':') else {
            return Err(ProviderError::protocol(format!("malformed header `{header}`")));
        };
        if name.trim().eq_ignore_ascii_case(CONTENT_LENGTH) {
            let length = value
                .trim()
                .parse()
                .map_err(|e| ProviderError::protocol(format!("bad Content-Length: {e}")))?;
            content_length = Some(length);
        }
    }

    let length = content_length
        .ok_or_else(|| ProviderError::protocol("message without Content-Length header"))?;
    if length > MAX_MESSAGE_BYTES {
        return Err(ProviderError::protocol(format!(
            "Content-Length {length} exceeds the {MAX_MESSAGE_BYTES} byte limit"
        )));
    }
    let mut body = Vec::new();
    body.try_reserve_exact(length).map_err(ProviderError::protocol)?;
    body.resize(length, 0);
    reader.read_exact(&mut body).await?;
    serde_json::from_slice(&body)
        .map(Some)
        .map_err(ProviderError::protocol)
}

/// Write one framed message and flush.
pub async fn write_message<W>(writer: &mut W, message: &Value) -> Result<(), ProviderError>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_vec(message).map_err(ProviderError::protocol)?;
    let header = format!("Content-Length: {}\r\n\r\n", body.len());
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}
