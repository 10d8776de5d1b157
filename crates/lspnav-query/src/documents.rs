use lspnav_core::document::TextDocument;
use lspnav_core::error::QueryError;
use lspnav_core::languages;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Interpret a tool `uri` argument.
///
/// Accepts a URI (`file:///…`, `untitled:…`) or a filesystem path; relative paths
/// resolve against `workspace`. Single-letter schemes are treated as Windows drive
/// letters rather than URIs.
pub fn resolve_document_uri(raw: &str, workspace: &Path) -> Result<Url, QueryError> {
    let raw = raw.trim();
    if let Ok(url) = Url::parse(raw)
        && url.scheme().len() > 1
    {
        return Ok(url);
    }

    let path = Path::new(raw);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    };
    Url::from_file_path(&absolute).map_err(|_| {
        QueryError::invalid_parameters(format!("`{raw}` is neither a URI nor a file path."))
    })
}

/// Load the current text of a document. Only `file` URIs can be read.
pub async fn open_text_document(uri: &Url) -> Result<TextDocument, QueryError> {
    if uri.scheme() != "file" {
        return Err(QueryError::document_unavailable(
            uri.as_str(),
            format!("unsupported scheme `{}`", uri.scheme()),
        ));
    }
    let path = uri
        .to_file_path()
        .map_err(|_| QueryError::document_unavailable(uri.as_str(), "not a local file path"))?;
    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| QueryError::document_unavailable(uri.as_str(), e))?;
    let language_id = languages::language_id_for_path(&path);
    debug!(uri = %uri, language_id, bytes = text.len(), "Opened document");
    Ok(TextDocument::new(uri.clone(), language_id, text))
}
