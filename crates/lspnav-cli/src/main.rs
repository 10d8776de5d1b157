mod commands;

use clap::{Parser, Subcommand};
use lspnav_core::config::Config;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lspnav",
    version,
    about = "Language-server navigation tools for AI coding assistants",
    long_about = "lspnav drives a language server over stdio and exposes two navigation\n\
        tools, go-to-definition and get-document-symbols, through an MCP server\n\
        or directly from the command line.\n\n\
        Quick start:\n  \
        lspnav serve-mcp --workspace .\n  \
        lspnav definition src/app.ts greet\n  \
        lspnav outline src/app.ts --max-depth 1"
)]
struct Cli {
    /// Enable verbose logging (set log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (default: .lspnav/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server (stdio or HTTP JSON-RPC transport)
    ///
    /// Spawns the configured language server for the workspace and exposes
    /// go-to-definition and get-document-symbols to MCP hosts.
    ///
    /// Examples:
    ///   lspnav serve-mcp --workspace .
    ///   lspnav serve-mcp --transport http --port 9100
    ServeMcp {
        /// Path to the project root (default: current directory)
        #[arg(long)]
        workspace: Option<String>,

        /// Transport mode: "stdio" (default) or "http"
        #[arg(long, default_value = "stdio")]
        transport: String,

        /// HTTP server port (only used with --transport http)
        #[arg(long, default_value = "9100")]
        port: u16,

        /// HTTP server bind address (only used with --transport http)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
    /// Print where a symbol is defined
    ///
    /// Finds the first whole-word occurrence of SYMBOL in FILE (optionally
    /// within a line range) and asks the language server for its definition.
    ///
    /// Examples:
    ///   lspnav definition src/app.ts greet
    ///   lspnav definition src/app.ts greet --start-line 10 --end-line 20
    Definition {
        /// Document path or URI; relative paths resolve against the workspace
        file: String,

        /// Exact symbol name (case-sensitive, whole word)
        symbol: String,

        /// First line to search, 1-based
        #[arg(long)]
        start_line: Option<i64>,

        /// Last line to search, 1-based and inclusive
        #[arg(long)]
        end_line: Option<i64>,

        /// Path to the project root (default: current directory)
        #[arg(long)]
        workspace: Option<String>,
    },
    /// Print the symbol outline of a document as JSON
    ///
    /// Examples:
    ///   lspnav outline src/app.ts
    ///   lspnav outline src/app.ts --max-depth 0
    Outline {
        /// Document path or URI; relative paths resolve against the workspace
        file: String,

        /// Deepest nesting level to include; 0 keeps top-level symbols only
        #[arg(long)]
        max_depth: Option<u32>,

        /// Path to the project root (default: current directory)
        #[arg(long)]
        workspace: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let workspace = resolve_path(match &cli.command {
        Commands::ServeMcp { workspace, .. }
        | Commands::Definition { workspace, .. }
        | Commands::Outline { workspace, .. } => workspace.clone(),
    })?;
    let workspace = std::fs::canonicalize(&workspace)
        .map_err(|e| anyhow::anyhow!("workspace {} is not accessible: {}", workspace.display(), e))?;
    let config_file = cli.config.as_deref().map(Path::new);
    let config = Config::load_with_file(Some(&workspace), config_file)?;

    // Logs go to stderr; stdout carries MCP traffic and command output.
    let filter = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::ServeMcp {
            transport,
            port,
            bind,
            ..
        } => match transport.as_str() {
            "http" => commands::serve_mcp::run_http(&workspace, &config, &bind, port)?,
            _ => commands::serve_mcp::run(&workspace, &config)?,
        },
        Commands::Definition {
            file,
            symbol,
            start_line,
            end_line,
            ..
        } => {
            commands::definition::run(&workspace, &config, &file, &symbol, start_line, end_line)?;
        }
        Commands::Outline {
            file, max_depth, ..
        } => {
            commands::outline::run(&workspace, &config, &file, max_depth)?;
        }
    }

    Ok(())
}

fn resolve_path(path: Option<String>) -> anyhow::Result<PathBuf> {
    match path {
        Some(p) => Ok(PathBuf::from(p)),
        None => Ok(std::env::current_dir()?),
    }
}
