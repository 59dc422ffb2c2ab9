use serde::{Deserialize, Serialize};

/// One `(value_type, unit)` slot of a sensor type's reading group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSchema {
    pub value_type: String,
    pub unit: String,
}

impl ValueSchema {
    pub fn new(value_type: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            value_type: value_type.into(),
            unit: unit.into(),
        }
    }
}

/// Immutable description of a sensor type, keyed by its message code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorTypeDescriptor {
    pub code: char,
    /// Display name stored with every reading, e.g. `Water`
    pub name: String,
    /// Never empty; position `i` of every reading group maps to entry `i`.
    pub value_schema: Vec<ValueSchema>,
}

impl SensorTypeDescriptor {
    /// Number of values carried by each reading group after its leading time token.
    pub fn arity(&self) -> usize {
        self.value_schema.len()
    }
}
