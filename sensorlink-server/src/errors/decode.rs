#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown sensor type in message: {0:?}")]
    UnknownSensorType(Option<char>),

    #[error("Invalid message format: {0}")]
    InvalidFormat(String),
}
