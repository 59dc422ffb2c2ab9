use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A known sensor id paired with the label shown to users.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorOption {
    pub id: String,
    pub label: String,
}

/// Pairs each sensor id with its configured display name, falling back to the id itself.
pub fn sensor_options(sensors: &[String], names: &HashMap<String, String>) -> Vec<SensorOption> {
    sensors
        .iter()
        .map(|id| SensorOption {
            id: id.clone(),
            label: names.get(id).cloned().unwrap_or_else(|| id.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_options_fall_back_to_id() {
        let names = HashMap::from([(
            "+12223334444".to_string(),
            "Campbell Creek Water Sensor".to_string(),
        )]);
        let sensors = vec!["+12223334444".to_string(), "+15556667777".to_string()];

        let options = sensor_options(&sensors, &names);

        assert_eq!(options[0].label, "Campbell Creek Water Sensor");
        assert_eq!(options[1].id, "+15556667777");
        assert_eq!(options[1].label, "+15556667777");
    }
}
