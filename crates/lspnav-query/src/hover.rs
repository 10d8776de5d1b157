use crate::provider::CodeIntelligenceProvider;
use lsp_types::{Hover, HoverContents, MarkedString, Position};
use lspnav_core::error::QueryError;
use tracing::error;
use url::Url;

/// Hover text at `position`: every fragment of every hover, joined with newlines.
pub async fn hover_text<P>(provider: &P, uri: &Url, position: Position) -> Result<String, QueryError>
where
    P: CodeIntelligenceProvider,
{
    let hovers = provider.hover(uri, position).await.map_err(|e| {
        error!(
            operation = "hover",
            uri = %uri,
            line = position.line,
            character = position.character,
            error = %e,
            "Hover request failed"
        );
        QueryError::provider("hover", uri.as_str(), e)
    })?;
    Ok(join_hover_fragments(&hovers))
}

/// Flatten hover results into a single string. No hovers yields "".
pub fn join_hover_fragments(hovers: &[Hover]) -> String {
    let mut fragments: Vec<&str> = Vec::new();
    for hover in hovers {
        match &hover.contents {
            HoverContents::Scalar(marked) => fragments.push(marked_value(marked)),
            HoverContents::Array(items) => fragments.extend(items.iter().map(marked_value)),
            HoverContents::Markup(markup) => fragments.push(&markup.value),
        }
    }
    fragments.join("\n")
}

fn marked_value(marked: &MarkedString) -> &str {
    match marked {
        MarkedString::String(value) => value,
        MarkedString::LanguageString(ls) => &ls.value,
    }
}
