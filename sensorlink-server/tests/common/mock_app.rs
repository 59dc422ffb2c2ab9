use std::sync::Arc;

use sensorlink_server::configs::{Database, SchemaManager, SensorTypeConfig, Storage, Transport};
use sensorlink_server::models::ReadingRecord;
use sensorlink_server::protocol::SensorTypeRegistry;
use sensorlink_server::repositories::ReadingRepository;
use sensorlink_server::services::IngestService;

pub struct MockApp {
    pub storage: Arc<Storage>,
    pub registry: Arc<SensorTypeRegistry>,
    pub repository: Arc<ReadingRepository>,
    pub service: IngestService,
}

impl MockApp {
    pub async fn new(transport: Transport) -> Self {
        let storage = Arc::new(Storage::new(Database {
            url: String::from("sqlite::memory:"),
            persistent: true,
        }, SchemaManager::default()).await.unwrap());

        let registry = Arc::new(SensorTypeRegistry::build(&[
            SensorTypeConfig::new("d", "Water", "distance meters; temperature celsius"),
            SensorTypeConfig::new("g", "Gate", "distance meters"),
            SensorTypeConfig::new("s", "Soil", "moisture percent; temperature celsius"),
        ]).unwrap());

        let repository = Arc::new(ReadingRepository::new(storage.clone()));
        repository.initialize().await.unwrap();

        let service = IngestService::new(registry.clone(), transport, repository.clone());

        Self {
            storage,
            registry,
            repository,
            service,
        }
    }

    pub async fn create_test_readings(&self, sensor_id: &str, base: i64, groups: usize) -> Vec<ReadingRecord> {
        let readings: Vec<ReadingRecord> = (0..groups as i64)
            .flat_map(|i| {
                [
                    ReadingRecord::new(sensor_id, "Water", base + i * 600, 100 + i, "distance", "meters"),
                    ReadingRecord::new(sensor_id, "Water", base + i * 600, 10 + i, "temperature", "celsius"),
                ]
            })
            .collect();

        self.repository.insert_many(&readings).await.unwrap();

        readings
    }
}
