pub mod definition;
pub mod outline;
pub mod serve_mcp;
