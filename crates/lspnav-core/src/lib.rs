pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod languages;
pub mod types;
