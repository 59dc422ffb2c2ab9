use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use std::sync::Arc;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Connection, Error, Sqlite, SqliteConnection, SqlitePool};

use crate::configs::schema::SchemaManager;
use crate::configs::settings::Database;

#[derive(Clone)]
pub struct Storage {
    options: SqliteConnectOptions,
    pool: Option<SqlitePool>,
    schema: Arc<SchemaManager>,
}

impl Storage {
    pub async fn new(database: Database, schema_manager: SchemaManager) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&database.url)?.create_if_missing(true);

        let pool = if database.persistent {
            // A single long-lived connection: in-memory databases vanish with it.
            let pool = SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options.clone())
                .await?;
            Some(pool)
        } else {
            None
        };

        tracing::debug!(url = %database.url, persistent = database.persistent, "storage configured");

        Ok(Self {
            options,
            pool,
            schema: Arc::new(schema_manager),
        })
    }

    /// Hands out the shared connection, or opens a fresh one in per-operation mode.
    pub async fn acquire(&self) -> Result<StorageConnection, Error> {
        match &self.pool {
            Some(pool) => Ok(StorageConnection::Pooled(pool.acquire().await?)),
            None => Ok(StorageConnection::Transient(
                SqliteConnection::connect_with(&self.options).await?,
            )),
        }
    }

    pub async fn create_schema(&self) -> Result<(), Error> {
        let mut connection = self.acquire().await?;

        sqlx::query(&self.schema.create_schema().join("\n"))
            .execute(&mut *connection)
            .await?;

        connection.release().await?;

        tracing::info!(tables = ?self.schema.table_names(), "schema ensured");

        Ok(())
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

/// A connection scoped to one storage operation.
///
/// Dropping it on an early return gives a pooled connection back and closes a transient one.
pub enum StorageConnection {
    Pooled(PoolConnection<Sqlite>),
    Transient(SqliteConnection),
}

impl StorageConnection {
    pub async fn release(self) -> Result<(), Error> {
        match self {
            StorageConnection::Pooled(connection) => {
                drop(connection);
                Ok(())
            }
            StorageConnection::Transient(connection) => connection.close().await,
        }
    }
}

impl Deref for StorageConnection {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        match self {
            StorageConnection::Pooled(connection) => connection,
            StorageConnection::Transient(connection) => connection,
        }
    }
}

impl DerefMut for StorageConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            StorageConnection::Pooled(connection) => connection,
            StorageConnection::Transient(connection) => connection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_keeps_data_between_operations() {
        let storage = Storage::new(
            Database {
                url: String::from("sqlite::memory:"),
                persistent: true,
            },
            SchemaManager::default(),
        )
        .await
        .unwrap();
        storage.create_schema().await.unwrap();

        let mut connection = storage.acquire().await.unwrap();
        sqlx::query("INSERT INTO readings (sensor_id, sensor_type, timestamp, value, value_type, value_unit) VALUES ('a', 'b', 1, 2, 'c', 'd')")
            .execute(&mut *connection)
            .await
            .unwrap();
        connection.release().await.unwrap();

        let mut connection = storage.acquire().await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM readings")
            .fetch_one(&mut *connection)
            .await
            .unwrap();

        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_transient_connections_share_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("readings.sqlite3").display());
        let storage = Storage::new(
            Database { url, persistent: false },
            SchemaManager::default(),
        )
        .await
        .unwrap();

        storage.create_schema().await.unwrap();
        storage.create_schema().await.unwrap();

        let mut connection = storage.acquire().await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM readings")
            .fetch_one(&mut *connection)
            .await
            .unwrap();
        connection.release().await.unwrap();

        assert!(dir.path().join("readings.sqlite3").exists());
        assert_eq!(count, 0);
    }
}
