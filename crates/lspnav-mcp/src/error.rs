use thiserror::Error;

/// Failures that stop a transport.
#[derive(Error, Debug)]
pub enum McpError {
    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_keep_their_cause() {
        let err: McpError =
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed").into();
        assert!(matches!(err, McpError::Io(_)));
        assert_eq!(err.to_string(), "io error: stdout closed");

        let err: McpError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(err.to_string().starts_with("failed to serialize response"));
    }
}
