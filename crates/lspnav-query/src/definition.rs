//! Go-to-definition pipeline: locate the symbol, ask the provider, normalize the answer.

use crate::locate::{ContextWindow, LineRange, LocateOutcome, locate_symbol};
use crate::provider::CodeIntelligenceProvider;
use lsp_types::{GotoDefinitionResponse, Range};
use lspnav_core::document::TextDocument;
use lspnav_core::error::QueryError;
use lspnav_core::types::{DefinitionReference, SymbolQuery};
use std::fmt;
use tracing::{debug, error};
use url::Url;

/// Outcome of a definition lookup. Every variant renders as the tool's text result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionReport {
    SymbolNotFound {
        symbol: String,
        uri: String,
        range: LineRange,
    },
    DefinitionNotFound {
        symbol: String,
    },
    Resolved {
        symbol: String,
        context: ContextWindow,
        references: Vec<DefinitionReference>,
    },
}

impl fmt::Display for DefinitionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SymbolNotFound { symbol, uri, range } => {
                write!(f, "{symbol} not found in {uri} lines {range}")
            }
            Self::DefinitionNotFound { symbol } => write!(f, "Definition for {symbol} not found"),
            Self::Resolved {
                symbol,
                context,
                references,
            } => {
                let targets = references
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "`{symbol}` from\n\n{context}\n\nis defined at {targets}")
            }
        }
    }
}

/// Find `query.symbol` in `document` and resolve where it is defined.
pub async fn go_to_definition<P>(
    provider: &P,
    document: &TextDocument,
    query: &SymbolQuery,
) -> Result<DefinitionReport, QueryError>
where
    P: CodeIntelligenceProvider,
{
    let (position, context) = match locate_symbol(document, query)? {
        LocateOutcome::Found { position, context } => (position, context),
        LocateOutcome::NotFound { range } => {
            return Ok(DefinitionReport::SymbolNotFound {
                symbol: query.symbol().to_string(),
                uri: query.uri().to_string(),
                range,
            });
        }
    };

    let response = provider
        .definition(document.uri(), position)
        .await
        .map_err(|e| {
            error!(
                operation = "definition",
                uri = %document.uri(),
                line = position.line,
                character = position.character,
                error = %e,
                "Definition request failed"
            );
            QueryError::provider("definition", document.uri().as_str(), e)
        })?;

    let references = definition_references(response);
    debug!(
        symbol = query.symbol(),
        uri = %document.uri(),
        definitions = references.len(),
        "Resolved definitions"
    );

    if references.is_empty() {
        return Ok(DefinitionReport::DefinitionNotFound {
            symbol: query.symbol().to_string(),
        });
    }
    Ok(DefinitionReport::Resolved {
        symbol: query.symbol().to_string(),
        context,
        references,
    })
}

/// Flatten a provider definition answer into references, in provider order.
pub fn definition_references(response: Option<GotoDefinitionResponse>) -> Vec<DefinitionReference> {
    match response {
        None => Vec::new(),
        Some(GotoDefinitionResponse::Scalar(location)) => {
            vec![reference(&location.uri, location.range)]
        }
        Some(GotoDefinitionResponse::Array(locations)) => locations
            .iter()
            .map(|location| reference(&location.uri, location.range))
            .collect(),
        Some(GotoDefinitionResponse::Link(links)) => links
            .iter()
            .map(|link| reference(&link.target_uri, link.target_range))
            .collect(),
    }
}

fn reference(uri: &Url, range: Range) -> DefinitionReference {
    DefinitionReference {
        path: display_path(uri),
        start_line: range.start.line + 1,
        end_line: range.end.line + 1,
    }
}

/// Local filesystem path for `file` URIs, the URI string otherwise.
fn display_path(uri: &Url) -> String {
    if uri.scheme() == "file"
        && let Ok(path) = uri.to_file_path()
    {
        return path.display().to_string();
    }
    uri.to_string()
}
