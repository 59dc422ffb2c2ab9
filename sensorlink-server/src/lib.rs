use std::sync::Arc;

use tokio::io::BufReader;

use crate::cli::Command;
use crate::configs::{SchemaManager, Settings, Storage};
use crate::models::sensor_options;
use crate::protocol::SensorTypeRegistry;
use crate::repositories::ReadingRepository;
use crate::services::IngestService;

pub mod cli;
pub mod configs;
pub mod errors;
pub mod models;
pub mod protocol;
pub mod repositories;
pub mod services;

pub async fn run(settings: &Arc<Settings>, command: Command) -> anyhow::Result<()> {
    let registry = Arc::new(SensorTypeRegistry::build(&settings.sensor_types)?);
    let storage = Arc::new(Storage::new(settings.database.clone(), SchemaManager::default()).await?);
    let repository = Arc::new(ReadingRepository::new(storage.clone()));

    repository.initialize().await?;

    match command {
        Command::Ingest => {
            tracing::info!(transport = ?settings.transport, sensor_types = registry.len(), "listening for sensor messages on stdin");

            let service = IngestService::new(registry, settings.transport, repository);
            let stats = service.listen(BufReader::new(tokio::io::stdin())).await?;

            tracing::info!(?stats, "input closed");
        }
        Command::Sensors => {
            let sensors = repository.list_sensors(false).await?;
            for option in sensor_options(&sensors, &settings.sensor_names) {
                println!("{}\t{}", option.id, option.label);
            }
        }
        Command::Query { sensor, range } => {
            let result = repository.query(sensor.as_deref(), range.start, range.end).await?;
            tracing::info!(
                value_types = ?result.value_types().collect::<Vec<_>>(),
                points = result.point_count(),
                "query answered"
            );
            println!("{}", serde_json::to_string(&result)?);
        }
    }

    storage.close().await;

    Ok(())
}
