use std::collections::HashMap;
use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub url: String,
    /// Hold one connection for the store's lifetime instead of one per operation.
    /// Must be true for in-memory databases.
    pub persistent: bool,
}

/// Which framing the raw transport text arrives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// `+CMT:` notifications from a GSM modem
    Sms,
    /// `<sender>:<body>` lines from a radio bridge
    Serial,
}

/// A sensor type as written in configuration.
///
/// `schema` lists the values of one reading group, e.g. `distance meters; temperature celsius`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorTypeConfig {
    pub code: String,
    pub name: String,
    pub schema: String,
}

impl SensorTypeConfig {
    pub fn new(code: &str, name: &str, schema: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            schema: schema.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub database: Database,
    pub transport: Transport,
    pub sensor_types: Vec<SensorTypeConfig>,
    /// Display names for sensor ids, e.g. phone numbers
    #[serde(default)]
    pub sensor_names: HashMap<String, String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// `SENSORLINK__DATABASE__URL` overrides `database.url`.
    fn environment() -> Environment {
        Environment::with_prefix("SENSORLINK").separator("__")
    }
}
