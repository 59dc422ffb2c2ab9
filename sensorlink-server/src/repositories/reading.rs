use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::Connection;
use tokio::sync::Mutex;

use crate::configs::Storage;
use crate::errors::StoreError;
use crate::models::{Column, DateRange, QueryResult, ReadingRecord, StoredReading};

pub struct ReadingRepository {
    storage: Arc<Storage>,
    /// Distinct sensor ids from the last uncached lookup; lives until restart.
    sensors: Mutex<Option<Vec<String>>>,
}

impl ReadingRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            storage,
            sensors: Mutex::new(None),
        }
    }
}

impl ReadingRepository {
    // Ensure the readings table exists, keeping any stored rows
    pub async fn initialize(&self) -> Result<(), StoreError> {
        self.storage.create_schema().await?;

        Ok(())
    }

    // Append all records in one transaction, or none of them
    pub async fn insert_many(&self, records: &[ReadingRecord]) -> Result<u64, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        let statement = format!(
            "INSERT INTO readings ({}) VALUES ($1, $2, $3, $4, $5, $6)",
            Column::list()
        );

        let mut connection = self.storage.acquire().await?;
        let mut transaction = connection.begin().await?;

        let stored: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('readings')")
            .fetch_all(&mut *transaction)
            .await?;
        if let Some(column) = Column::ALL
            .into_iter()
            .find(|column| !stored.iter().any(|name| name == column.name()))
        {
            return Err(StoreError::SchemaMismatch { column });
        }

        for record in records {
            sqlx::query(&statement)
                .bind(&record.sensor_id)
                .bind(&record.sensor_type)
                .bind(record.timestamp)
                .bind(record.value)
                .bind(&record.value_type)
                .bind(&record.value_unit)
                .execute(&mut *transaction)
                .await?;
        }

        transaction.commit().await?;
        connection.release().await?;

        tracing::debug!(count = records.len(), "readings committed");

        Ok(records.len() as u64)
    }

    // Distinct sensor ids with stored readings, ordered by id
    pub async fn list_sensors(&self, use_cache: bool) -> Result<Vec<String>, StoreError> {
        let mut cached = self.sensors.lock().await;

        if use_cache {
            if let Some(sensors) = cached.as_ref().filter(|sensors| !sensors.is_empty()) {
                return Ok(sensors.clone());
            }
        }

        let mut connection = self.storage.acquire().await?;
        let sensors: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT DISTINCT {0} FROM readings ORDER BY {0}",
            Column::SensorId
        ))
        .fetch_all(&mut *connection)
        .await?;
        connection.release().await?;

        *cached = Some(sensors.clone());

        Ok(sensors)
    }

    /// Readings grouped by value type, with millisecond timestamps.
    ///
    /// The sensor filter only applies when `sensor` is among the (cached) known
    /// sensors. An unrecognised id is ignored and the query runs unfiltered.
    pub async fn query(
        &self,
        sensor: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<QueryResult, StoreError> {
        let (start, end) = DateRange::new(start_date, end_date).local_bounds()?;

        let known = self.list_sensors(true).await?;
        let requested = sensor;
        let sensor = requested.filter(|id| known.iter().any(|candidate| candidate == id));
        if let (Some(requested), None) = (requested, sensor) {
            tracing::debug!(sensor = requested, "unknown sensor, querying without sensor filter");
        }

        let mut conditions = Vec::new();
        if sensor.is_some() {
            conditions.push(format!("{} = ?", Column::SensorId));
        }
        if start.is_some() {
            conditions.push(format!("{} >= ?", Column::Timestamp));
        }
        if end.is_some() {
            conditions.push(format!("{} <= ?", Column::Timestamp));
        }

        let mut statement = format!("SELECT id, {} FROM readings", Column::list());
        if !conditions.is_empty() {
            statement.push_str(" WHERE ");
            statement.push_str(&conditions.join(" AND "));
        }
        statement.push_str(" ORDER BY id");

        let mut query = sqlx::query_as::<_, StoredReading>(&statement);
        if let Some(sensor) = sensor {
            query = query.bind(sensor);
        }
        if let Some(start) = start {
            query = query.bind(start);
        }
        if let Some(end) = end {
            query = query.bind(end);
        }

        let mut connection = self.storage.acquire().await?;
        let rows = query.fetch_all(&mut *connection).await?;
        connection.release().await?;

        let mut result = QueryResult::new();
        for row in rows {
            result.push(row);
        }

        Ok(result)
    }

    // Every stored row in insertion order
    pub async fn find_all(&self) -> Result<Vec<StoredReading>, StoreError> {
        let mut connection = self.storage.acquire().await?;
        let rows = sqlx::query_as::<_, StoredReading>(&format!(
            "SELECT id, {} FROM readings ORDER BY id",
            Column::list()
        ))
        .fetch_all(&mut *connection)
        .await?;
        connection.release().await?;

        Ok(rows)
    }
}
