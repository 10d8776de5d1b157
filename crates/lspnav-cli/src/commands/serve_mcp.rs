use anyhow::{Context, Result};
use lspnav_core::config::Config;
use lspnav_lsp::LspProvider;
use lspnav_mcp::server::{McpServer, run_stdio};
use std::path::Path;
use tracing::warn;

pub fn run(workspace: &Path, config: &Config) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(async {
        let provider = LspProvider::start(&config.lsp, workspace)
            .await
            .context("Failed to start language server")?;
        let server = McpServer::new(provider, workspace, config.outline.hover_strategy_typed());
        let served = run_stdio(&server).await;
        if let Err(e) = server.provider().shutdown().await {
            warn!(error = %e, "Language server shutdown failed");
        }
        served.map_err(|e| anyhow::anyhow!("MCP server error: {}", e))
    })
}

/// Start the MCP server in HTTP transport mode.
pub fn run_http(workspace: &Path, config: &Config, bind_addr: &str, port: u16) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(async {
        let provider = LspProvider::start(&config.lsp, workspace)
            .await
            .context("Failed to start language server")?;
        let server = McpServer::new(provider, workspace, config.outline.hover_strategy_typed());
        lspnav_mcp::http::run_http_server(server, bind_addr, port)
            .await
            .map_err(|e| anyhow::anyhow!("MCP HTTP server error: {}", e))
    })
}
