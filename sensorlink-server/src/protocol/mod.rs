mod decoder;
mod extractor;
mod registry;

pub use decoder::ReadingDecoder;
pub use extractor::{extractor_for, Extractor, SerialExtractor, SmsExtractor};
pub use registry::SensorTypeRegistry;
