//! Language-server-backed code intelligence.

pub mod client;
pub mod framing;
mod launcher;
pub mod provider;

pub use provider::LspProvider;
