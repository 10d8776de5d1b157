//! Depth-limited document outline with hover enrichment.
//!
//! The walk runs in three steps:
//! 1. build a filtered skeleton from the provider's symbol tree (synchronous),
//! 2. fetch hover text for every kept node in pre-order using a [`HoverStrategy`],
//! 3. assemble complete [`SymbolNode`]s, children before their parent is returned.

use crate::hover::hover_text;
use crate::provider::CodeIntelligenceProvider;
use crate::symbol_kind::symbol_kind_label;
use futures::{StreamExt, TryStreamExt};
use lsp_types::{DocumentSymbol, DocumentSymbolResponse, Position, SymbolInformation};
use lspnav_core::error::QueryError;
use lspnav_core::types::{HoverStrategy, SymbolKindLabel, SymbolNode};
use std::collections::BTreeMap;
use tracing::{debug, error};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Skeleton {
    name: String,
    detail: Option<String>,
    kind: SymbolKindLabel,
    anchor: Position,
    start_line: u32,
    end_line: u32,
    children: Vec<Skeleton>,
}

/// Build the outline of `uri`, keeping symbols whose depth is at most `max_depth`.
pub async fn document_outline<P>(
    provider: &P,
    uri: &Url,
    max_depth: Option<u32>,
    strategy: HoverStrategy,
) -> Result<Vec<SymbolNode>, QueryError>
where
    P: CodeIntelligenceProvider,
{
    let response = provider.document_symbols(uri).await.map_err(|e| {
        error!(
            operation = "documentSymbol",
            uri = %uri,
            error = %e,
            "Document symbol request failed"
        );
        QueryError::provider("documentSymbol", uri.as_str(), e)
    })?;

    let mut tally = BTreeMap::new();
    let skeleton = match response {
        None => Vec::new(),
        Some(DocumentSymbolResponse::Nested(symbols)) => {
            build_skeleton(&symbols, 0, max_depth, &mut tally)
        }
        Some(DocumentSymbolResponse::Flat(symbols)) => flat_skeleton(&symbols, &mut tally),
    };
    debug!(
        uri = %uri,
        top_level = skeleton.len(),
        kinds = ?tally,
        "Walked document symbols"
    );

    let mut anchors = Vec::new();
    collect_anchors(&skeleton, &mut anchors);
    let hovers = fetch_hovers(provider, uri, &anchors, strategy).await?;

    let mut hovers = hovers.into_iter();
    Ok(assemble(skeleton, &mut hovers))
}

/// Text result for an outline: a header and the nodes as pretty-printed JSON.
pub fn render_outline(label: &str, nodes: &[SymbolNode]) -> Result<String, QueryError> {
    let json = serde_json::to_string_pretty(nodes)?;
    Ok(format!("Symbols for {label}:\n\n```json\n{json}\n```"))
}

fn build_skeleton(
    symbols: &[DocumentSymbol],
    depth: u32,
    max_depth: Option<u32>,
    tally: &mut BTreeMap<SymbolKindLabel, usize>,
) -> Vec<Skeleton> {
    symbols
        .iter()
        .filter(|_| max_depth.is_none_or(|max| depth <= max))
        .map(|symbol| {
            let kind = symbol_kind_label(symbol.kind);
            *tally.entry(kind).or_default() += 1;
            let children = symbol
                .children
                .as_deref()
                .map(|children| build_skeleton(children, depth + 1, max_depth, tally))
                .unwrap_or_default();
            Skeleton {
                name: symbol.name.clone(),
                detail: symbol.detail.clone().filter(|d| !d.is_empty()),
                kind,
                anchor: symbol.selection_range.start,
                start_line: symbol.range.start.line + 1,
                end_line: symbol.range.end.line + 1,
                children,
            }
        })
        .collect()
}

fn flat_skeleton(
    symbols: &[SymbolInformation],
    tally: &mut BTreeMap<SymbolKindLabel, usize>,
) -> Vec<Skeleton> {
    symbols
        .iter()
        .map(|symbol| {
            let kind = symbol_kind_label(symbol.kind);
            *tally.entry(kind).or_default() += 1;
            let range = symbol.location.range;
            Skeleton {
                name: symbol.name.clone(),
                detail: None,
                kind,
                anchor: range.start,
                start_line: range.start.line + 1,
                end_line: range.end.line + 1,
                children: Vec::new(),
            }
        })
        .collect()
}

fn collect_anchors(nodes: &[Skeleton], out: &mut Vec<Position>) {
    for node in nodes {
        out.push(node.anchor);
        collect_anchors(&node.children, out);
    }
}

async fn fetch_hovers<P>(
    provider: &P,
    uri: &Url,
    anchors: &[Position],
    strategy: HoverStrategy,
) -> Result<Vec<String>, QueryError>
where
    P: CodeIntelligenceProvider,
{
    match strategy {
        HoverStrategy::Sequential => {
            let mut hovers = Vec::with_capacity(anchors.len());
            for anchor in anchors {
                hovers.push(hover_text(provider, uri, *anchor).await?);
            }
            Ok(hovers)
        }
        HoverStrategy::Concurrent { limit } => {
            // `buffered` yields in input order regardless of completion order.
            futures::stream::iter(anchors.iter().copied().map(|anchor| hover_text(provider, uri, anchor)))
                .buffered(limit.max(1))
                .try_collect()
                .await
        }
    }
}

fn assemble(nodes: Vec<Skeleton>, hovers: &mut impl Iterator<Item = String>) -> Vec<SymbolNode> {
    nodes
        .into_iter()
        .map(|node| {
            let hover_information = hovers.next().unwrap_or_default();
            let children = assemble(node.children, hovers);
            SymbolNode {
                name: node.name,
                detail: node.detail,
                kind: node.kind,
                hover_information,
                location_line_number: node.anchor.line + 1,
                definition_start_line_number: node.start_line,
                definition_end_line_number: node.end_line,
                children: (!children.is_empty()).then_some(children),
            }
        })
        .collect()
}
