use lsp_types::{DocumentSymbolResponse, GotoDefinitionResponse, Hover, Position};
use lspnav_core::error::ProviderError;
use std::future::Future;
use url::Url;

/// Source of code intelligence for a document: definitions, hovers and symbols.
///
/// Implementations are treated as slow and remote-like. Callers await one request
/// at a time unless they opt into a concurrent hover strategy.
///
/// Two implementations ship with the workspace:
/// - `lspnav_lsp::LspProvider`: a language server spoken to over stdio
/// - test doubles that answer from in-memory tables
pub trait CodeIntelligenceProvider: Send + Sync {
    /// Resolve where the symbol at `position` is defined.
    fn definition(
        &self,
        uri: &Url,
        position: Position,
    ) -> impl Future<Output = Result<Option<GotoDefinitionResponse>, ProviderError>> + Send;

    /// Resolve hover fragments at `position`. An empty vector means no hover.
    fn hover(
        &self,
        uri: &Url,
        position: Position,
    ) -> impl Future<Output = Result<Vec<Hover>, ProviderError>> + Send;

    /// Resolve the symbol tree declared by the document.
    fn document_symbols(
        &self,
        uri: &Url,
    ) -> impl Future<Output = Result<Option<DocumentSymbolResponse>, ProviderError>> + Send;
}
