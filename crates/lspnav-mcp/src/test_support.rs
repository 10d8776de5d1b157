use lsp_types::{
    DocumentSymbol, DocumentSymbolResponse, GotoDefinitionResponse, Hover, HoverContents,
    Location, MarkedString, Position, Range, SymbolKind,
};
use lspnav_core::error::ProviderError;
use lspnav_query::provider::CodeIntelligenceProvider;
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// In-memory provider keyed by zero-based `(line, character)`.
#[derive(Default)]
pub struct StaticProvider {
    pub definitions: HashMap<(u32, u32), GotoDefinitionResponse>,
    pub hovers: HashMap<(u32, u32), String>,
    pub symbols: Option<DocumentSymbolResponse>,
    pub failing: bool,
}

impl CodeIntelligenceProvider for StaticProvider {
    async fn definition(
        &self,
        _uri: &Url,
        position: Position,
    ) -> Result<Option<GotoDefinitionResponse>, ProviderError> {
        if self.failing {
            return Err(ProviderError::ServerExited);
        }
        Ok(self
            .definitions
            .get(&(position.line, position.character))
            .cloned())
    }

    async fn hover(&self, _uri: &Url, position: Position) -> Result<Vec<Hover>, ProviderError> {
        if self.failing {
            return Err(ProviderError::ServerExited);
        }
        Ok(self
            .hovers
            .get(&(position.line, position.character))
            .map(|text| Hover {
                contents: HoverContents::Scalar(MarkedString::String(text.clone())),
                range: None,
            })
            .into_iter()
            .collect())
    }

    async fn document_symbols(
        &self,
        _uri: &Url,
    ) -> Result<Option<DocumentSymbolResponse>, ProviderError> {
        if self.failing {
            return Err(ProviderError::ServerExited);
        }
        Ok(self.symbols.clone())
    }
}

/// `function greet() {}` on line 1 and a call to it on line 3.
pub fn write_fixture(dir: &Path) -> Url {
    let path = dir.join("greet.ts");
    std::fs::write(&path, "function greet() {}\n\ngreet();\n").unwrap();
    Url::from_file_path(&path).unwrap()
}

/// Provider that knows about the symbols in [`write_fixture`].
pub fn fixture_provider(uri: &Url) -> StaticProvider {
    let mut provider = StaticProvider::default();
    provider.definitions.insert(
        (2, 0),
        GotoDefinitionResponse::Scalar(Location::new(
            uri.clone(),
            Range::new(Position::new(0, 0), Position::new(0, 19)),
        )),
    );
    provider
        .hovers
        .insert((0, 9), "function greet(): void".to_string());
    #[allow(deprecated)]
    let greet = DocumentSymbol {
        name: "greet".to_string(),
        detail: None,
        kind: SymbolKind::FUNCTION,
        tags: None,
        deprecated: None,
        range: Range::new(Position::new(0, 0), Position::new(0, 19)),
        selection_range: Range::new(Position::new(0, 9), Position::new(0, 14)),
        children: None,
    };
    provider.symbols = Some(DocumentSymbolResponse::Nested(vec![greet]));
    provider
}
