mod schema;
mod settings;
mod storage;

pub use schema::SchemaManager;
pub use settings::{Database, Logger, SensorTypeConfig, Settings, Transport};
pub use storage::{Storage, StorageConnection};
