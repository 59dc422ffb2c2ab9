use std::collections::HashMap;

use crate::configs::SensorTypeConfig;
use crate::errors::ConfigError;
use crate::models::{SensorTypeDescriptor, ValueSchema};

const GROUP_DELIM: char = ';';

/// Lookup of sensor type code to descriptor. Read-only once built; a new
/// configuration means building a new registry.
#[derive(Clone, Debug, Default)]
pub struct SensorTypeRegistry {
    types: HashMap<char, SensorTypeDescriptor>,
}

impl SensorTypeRegistry {
    pub fn build(config: &[SensorTypeConfig]) -> Result<Self, ConfigError> {
        let mut types = HashMap::with_capacity(config.len());

        for entry in config {
            let code = Self::parse_code(&entry.code)?;
            let value_schema = Self::parse_schema(code, &entry.schema)?;

            if types.contains_key(&code) {
                return Err(ConfigError::DuplicateCode(code));
            }

            types.insert(
                code,
                SensorTypeDescriptor {
                    code,
                    name: entry.name.clone(),
                    value_schema,
                },
            );
        }

        Ok(Self { types })
    }

    pub fn get(&self, code: char) -> Option<&SensorTypeDescriptor> {
        self.types.get(&code)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn parse_code(raw: &str) -> Result<char, ConfigError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(ConfigError::EmptyCode),
            (Some(code), None) if !code.is_whitespace() => Ok(code),
            _ => Err(ConfigError::InvalidCode(raw.to_string())),
        }
    }

    /// `"distance meters; temperature celsius"` becomes two `(type, unit)` slots.
    fn parse_schema(code: char, spec: &str) -> Result<Vec<ValueSchema>, ConfigError> {
        spec.split(GROUP_DELIM)
            .map(|group| {
                let tokens: Vec<&str> = group.split_whitespace().collect();
                match tokens.as_slice() {
                    [value_type, unit] => Ok(ValueSchema::new(*value_type, *unit)),
                    _ => Err(ConfigError::MalformedSchema {
                        code,
                        group: group.trim().to_string(),
                    }),
                }
            })
            .collect()
    }
}
