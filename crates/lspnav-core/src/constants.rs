/// Default data directory name under home.
pub const DEFAULT_DATA_DIR: &str = ".lspnav";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = ".lspnav/config.toml";

/// MCP protocol version advertised on `initialize`.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Tool name for the range-bounded definition lookup.
pub const TOOL_GO_TO_DEFINITION: &str = "go-to-definition";

/// Tool name for the hover-enriched document outline.
pub const TOOL_GET_DOCUMENT_SYMBOLS: &str = "get-document-symbols";

/// Default language server launched by the LSP-backed provider.
pub const DEFAULT_LSP_COMMAND: &str = "rust-analyzer";

/// Per-request timeout for language server calls (30s).
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Timeout for the `initialize` handshake (60s); servers index on startup.
pub const DEFAULT_STARTUP_TIMEOUT_MS: u64 = 60_000;

/// Upper bound on in-flight hover requests for the concurrent strategy.
pub const DEFAULT_HOVER_CONCURRENCY: usize = 8;

/// Number of lines shown on each side of a located symbol.
pub const CONTEXT_RADIUS_LINES: u32 = 1;

/// Largest language server message body accepted (64 MiB).
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024 * 1024;
