use thiserror::Error;

/// Canonical protocol-level error codes surfaced in JSON-RPC error `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolErrorCode {
    InvalidInput,
    UnknownTool,
    FileNotFound,
    ProviderError,
    InternalError,
}

impl ProtocolErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::UnknownTool => "unknown_tool",
            Self::FileNotFound => "file_not_found",
            Self::ProviderError => "provider_error",
            Self::InternalError => "internal_error",
        }
    }

    /// JSON-RPC 2.0 numeric code paired with this protocol code.
    pub const fn jsonrpc_code(self) -> i32 {
        match self {
            Self::InvalidInput => -32602,
            Self::UnknownTool => -32601,
            Self::FileNotFound | Self::ProviderError | Self::InternalError => -32603,
        }
    }
}

impl std::fmt::Display for ProtocolErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config value: {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised by a code intelligence provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("language server returned an error for {method}: {message} (code {code})")]
    Request {
        method: String,
        code: i64,
        message: String,
    },

    #[error("language server did not answer {method} within {timeout_ms}ms")]
    Timeout { method: String, timeout_ms: u64 },

    #[error("language server exited")]
    ServerExited,

    #[error("failed to start language server `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    pub fn request(method: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self::Request {
            method: method.into(),
            code,
            message: message.into(),
        }
    }

    pub fn timeout(method: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            method: method.into(),
            timeout_ms,
        }
    }

    /// Malformed payloads. Use as `.map_err(ProviderError::protocol)`.
    pub fn protocol<E: std::fmt::Display>(e: E) -> Self {
        Self::Protocol(e.to_string())
    }
}

/// Failures of a tool invocation.
///
/// "Nothing found" outcomes are not errors; they are successful reports.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid parameters. {0}")]
    InvalidParameters(String),

    #[error("document not available: {uri}: {reason}")]
    DocumentUnavailable { uri: String, reason: String },

    #[error("{operation} failed for {uri}: {source}")]
    Provider {
        operation: &'static str,
        uri: String,
        #[source]
        source: ProviderError,
    },

    #[error("failed to serialize outline: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QueryError {
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters(message.into())
    }

    pub fn document_unavailable(uri: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::DocumentUnavailable {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }

    pub fn provider(operation: &'static str, uri: impl Into<String>, source: ProviderError) -> Self {
        Self::Provider {
            operation,
            uri: uri.into(),
            source,
        }
    }

    /// Protocol code reported to tool callers.
    pub fn protocol_code(&self) -> ProtocolErrorCode {
        match self {
            Self::InvalidParameters(_) => ProtocolErrorCode::InvalidInput,
            Self::DocumentUnavailable { .. } => ProtocolErrorCode::FileNotFound,
            Self::Provider { .. } => ProtocolErrorCode::ProviderError,
            Self::Serialization(_) => ProtocolErrorCode::InternalError,
        }
    }
}
