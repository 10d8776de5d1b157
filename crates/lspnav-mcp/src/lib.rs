pub mod error;
pub mod http;
pub mod protocol;
pub mod server;
pub mod tools;

#[cfg(test)]
mod test_support;
