use anyhow::{Context, Result};
use lspnav_core::config::Config;
use lspnav_core::types::OutlineQuery;
use lspnav_lsp::LspProvider;
use lspnav_query::documents::{open_text_document, resolve_document_uri};
use lspnav_query::outline::{document_outline, render_outline};
use std::path::Path;

pub fn run(workspace: &Path, config: &Config, file: &str, max_depth: Option<u32>) -> Result<()> {
    let query = OutlineQuery::new(file, max_depth)?;
    let uri = resolve_document_uri(query.uri(), workspace)?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let nodes = rt.block_on(async {
        open_text_document(&uri).await?;
        let provider = LspProvider::start(&config.lsp, workspace)
            .await
            .context("Failed to start language server")?;
        let nodes = document_outline(
            &provider,
            &uri,
            query.max_depth(),
            config.outline.hover_strategy_typed(),
        )
        .await;
        provider.shutdown().await?;
        anyhow::Ok(nodes?)
    })?;

    println!("{}", render_outline(query.uri(), &nodes)?);
    Ok(())
}
