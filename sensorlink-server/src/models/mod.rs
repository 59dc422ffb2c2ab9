mod envelope;
mod query;
mod reading;
mod sensor;
mod sensor_type;

pub use envelope::RawEnvelope;
pub use query::{parse_input_date, DateRange, QueryResult, SeriesGroup, SeriesMeta};
pub use reading::{Column, ReadingRecord, ReadingTable, StoredReading};
pub use sensor::{sensor_options, SensorOption};
pub use sensor_type::{SensorTypeDescriptor, ValueSchema};

pub trait Table {
    /// The name of the table
    fn name(&self) -> &'static str;

    /// The SQL statement to create the table
    fn create(&self) -> String;
}
