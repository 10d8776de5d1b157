use anyhow::{Context, Result};
use lspnav_core::config::Config;
use lspnav_core::types::SymbolQuery;
use lspnav_lsp::LspProvider;
use lspnav_query::definition::go_to_definition;
use lspnav_query::documents::{open_text_document, resolve_document_uri};
use std::path::Path;

pub fn run(
    workspace: &Path,
    config: &Config,
    file: &str,
    symbol: &str,
    start_line: Option<i64>,
    end_line: Option<i64>,
) -> Result<()> {
    let query = SymbolQuery::new(symbol, file, start_line, end_line)?;
    let uri = resolve_document_uri(query.uri(), workspace)?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let report = rt.block_on(async {
        let document = open_text_document(&uri).await?;
        let provider = LspProvider::start(&config.lsp, workspace)
            .await
            .context("Failed to start language server")?;
        let report = go_to_definition(&provider, &document, &query).await;
        provider.shutdown().await?;
        anyhow::Ok(report?)
    })?;

    println!("{report}");
    Ok(())
}
