pub mod definition;
pub mod documents;
pub mod hover;
pub mod locate;
pub mod outline;
pub mod provider;
pub mod symbol_kind;
