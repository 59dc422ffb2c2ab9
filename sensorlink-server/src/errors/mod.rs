mod config;
mod decode;
mod query;
mod store;

pub use config::ConfigError;
pub use decode::DecodeError;
pub use query::QueryError;
pub use store::StoreError;
