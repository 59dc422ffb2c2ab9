#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid date '{0}', expected MM/DD/YYYY")]
    InvalidDate(String),

    #[error("Date '{0}' has no local midnight")]
    UnrepresentableDate(chrono::NaiveDate),

    #[error("Unknown command '{0}', expected ingest, sensors or query")]
    UnknownCommand(String),

    #[error("Unknown argument '{0}'")]
    UnknownArgument(String),

    #[error("Missing value for '{0}'")]
    MissingValue(String),

    #[error("Invalid day count '{0}'")]
    InvalidDays(String),
}
