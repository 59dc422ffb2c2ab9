#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Sensor type code is empty")]
    EmptyCode,

    #[error("Sensor type code '{0}' must be a single character")]
    InvalidCode(String),

    #[error("Sensor type code '{0}' is declared more than once")]
    DuplicateCode(char),

    #[error("Sensor type '{code}' has malformed value group '{group}', expected '<type> <unit>'")]
    MalformedSchema { code: char, group: String },
}
