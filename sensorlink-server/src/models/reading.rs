use std::fmt;

use serde::{Deserialize, Serialize};

use super::Table;

/// One value of one sampling event, flattened.
///
/// A sampling moment carrying N schema values becomes N records that share
/// `sensor_id`, `sensor_type` and `timestamp`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub sensor_id: String,
    /// Display name of the sensor type, e.g. `Water`
    pub sensor_type: String,
    /// Unix seconds
    pub timestamp: i64,
    pub value: i64,
    pub value_type: String,
    pub value_unit: String,
}

impl ReadingRecord {
    pub fn new(
        sensor_id: impl Into<String>,
        sensor_type: impl Into<String>,
        timestamp: i64,
        value: i64,
        value_type: impl Into<String>,
        value_unit: impl Into<String>,
    ) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            sensor_type: sensor_type.into(),
            timestamp,
            value,
            value_type: value_type.into(),
            value_unit: value_unit.into(),
        }
    }
}

/// A persisted reading together with its surrogate id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredReading {
    pub id: i64,
    pub sensor_id: String,
    pub sensor_type: String,
    pub timestamp: i64,
    pub value: i64,
    pub value_type: String,
    pub value_unit: String,
}

impl From<StoredReading> for ReadingRecord {
    fn from(row: StoredReading) -> Self {
        Self {
            sensor_id: row.sensor_id,
            sensor_type: row.sensor_type,
            timestamp: row.timestamp,
            value: row.value,
            value_type: row.value_type,
            value_unit: row.value_unit,
        }
    }
}

/// Data columns of the `readings` table in their fixed ordinal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    SensorId,
    SensorType,
    Timestamp,
    Value,
    ValueType,
    ValueUnit,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::SensorId,
        Column::SensorType,
        Column::Timestamp,
        Column::Value,
        Column::ValueType,
        Column::ValueUnit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::SensorId => "sensor_id",
            Column::SensorType => "sensor_type",
            Column::Timestamp => "timestamp",
            Column::Value => "value",
            Column::ValueType => "value_type",
            Column::ValueUnit => "value_unit",
        }
    }

    /// Comma separated column list, in ordinal order.
    pub fn list() -> String {
        Self::ALL.map(Column::name).join(", ")
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone)]
pub struct ReadingTable;

impl Table for ReadingTable {
    fn name(&self) -> &'static str {
        "readings"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS readings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sensor_id TEXT NOT NULL,
                sensor_type TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                value INTEGER NOT NULL,
                value_type TEXT NOT NULL,
                value_unit TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS readings_sensor_timestamp
                ON readings (sensor_id, timestamp);
            "#,
        )
    }
}
