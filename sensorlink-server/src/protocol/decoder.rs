use crate::errors::DecodeError;
use crate::models::{ReadingRecord, SensorTypeDescriptor};

use super::SensorTypeRegistry;

/// Decodes sensor message bodies of the form
///
/// ```text
/// <code><t0> <v1> .. <vn>;<m1> <v1> .. <vn>;...
/// ```
///
/// `t0` is absolute unix seconds, every later `m` is minutes since `t0`, and `n`
/// is the arity of the sensor type named by `code`. At least two groups are required.
pub struct ReadingDecoder;

impl ReadingDecoder {
    const GROUP_DELIM: char = ';';
    const VALUE_DELIM: char = ' ';
    const MIN_GROUPS: usize = 2;
    const SECONDS_PER_MINUTE: i64 = 60;

    pub fn decode(
        registry: &SensorTypeRegistry,
        sender_id: &str,
        body: &str,
    ) -> Result<Vec<ReadingRecord>, DecodeError> {
        let mut chars = body.chars();
        let code = chars.next();
        let descriptor = code
            .and_then(|code| registry.get(code))
            .ok_or(DecodeError::UnknownSensorType(code))?;

        let groups = Self::parse_groups(chars.as_str().trim(), descriptor.arity())?;

        Self::flatten(descriptor, sender_id, &groups)
    }

    /// Splits the message into `(time, values)` groups, rejecting anything the
    /// grammar does not describe exactly.
    fn parse_groups(message: &str, arity: usize) -> Result<Vec<(i64, Vec<i64>)>, DecodeError> {
        let groups: Vec<&str> = message.split(Self::GROUP_DELIM).collect();
        if groups.len() < Self::MIN_GROUPS {
            return Err(DecodeError::InvalidFormat(format!(
                "expected at least {} reading groups, found {}",
                Self::MIN_GROUPS,
                groups.len()
            )));
        }

        groups
            .into_iter()
            .enumerate()
            .map(|(index, group)| {
                let numbers = group
                    .split(Self::VALUE_DELIM)
                    .map(Self::parse_number)
                    .collect::<Result<Vec<i64>, DecodeError>>()?;

                match numbers.split_first() {
                    Some((time, values)) if values.len() == arity => Ok((*time, values.to_vec())),
                    _ => Err(DecodeError::InvalidFormat(format!(
                        "group {index} has {} values, expected {arity}",
                        numbers.len().saturating_sub(1)
                    ))),
                }
            })
            .collect()
    }

    fn parse_number(token: &str) -> Result<i64, DecodeError> {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DecodeError::InvalidFormat(format!("'{token}' is not a number")));
        }

        token
            .parse()
            .map_err(|_| DecodeError::InvalidFormat(format!("'{token}' is out of range")))
    }

    fn flatten(
        descriptor: &SensorTypeDescriptor,
        sender_id: &str,
        groups: &[(i64, Vec<i64>)],
    ) -> Result<Vec<ReadingRecord>, DecodeError> {
        let base = groups.first().map(|(time, _)| *time).unwrap_or_default();
        let mut records = Vec::with_capacity(groups.len() * descriptor.arity());

        for (index, (time, values)) in groups.iter().enumerate() {
            let timestamp = if index == 0 {
                base
            } else {
                time.checked_mul(Self::SECONDS_PER_MINUTE)
                    .and_then(|seconds| base.checked_add(seconds))
                    .ok_or_else(|| {
                        DecodeError::InvalidFormat(format!("group {index} timestamp overflows"))
                    })?
            };

            records.extend(values.iter().zip(&descriptor.value_schema).map(|(value, schema)| {
                ReadingRecord::new(
                    sender_id,
                    descriptor.name.as_str(),
                    timestamp,
                    *value,
                    schema.value_type.as_str(),
                    schema.unit.as_str(),
                )
            }));
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use crate::configs::SensorTypeConfig;

    use super::*;

    const SENDER: &str = "+12223334444";

    fn registry() -> SensorTypeRegistry {
        SensorTypeRegistry::build(&[
            SensorTypeConfig::new("d", "Water", "distance meters; temperature celsius"),
            SensorTypeConfig::new("g", "Gate", "distance meters"),
            SensorTypeConfig::new("s", "Soil", "moisture percent; temperature celsius"),
        ])
        .unwrap()
    }

    fn record(timestamp: i64, value: i64, value_type: &str, unit: &str) -> ReadingRecord {
        ReadingRecord::new(SENDER, "Water", timestamp, value, value_type, unit)
    }

    #[test]
    fn test_decode_two_groups() {
        let readings = ReadingDecoder::decode(&registry(), "+1222", "d 1399735312 100 10;20 200 20").unwrap();

        assert_eq!(
            readings,
            vec![
                ReadingRecord::new("+1222", "Water", 1399735312, 100, "distance", "meters"),
                ReadingRecord::new("+1222", "Water", 1399735312, 10, "temperature", "celsius"),
                ReadingRecord::new("+1222", "Water", 1399736512, 200, "distance", "meters"),
                ReadingRecord::new("+1222", "Water", 1399736512, 20, "temperature", "celsius"),
            ]
        );
    }

    #[test]
    fn test_decode_valid_readings() {
        let readings =
            ReadingDecoder::decode(&registry(), SENDER, "d 1399735312 100 10;20 200 20;40 400 40;65 600 60").unwrap();

        assert_eq!(
            readings,
            vec![
                record(1399735312, 100, "distance", "meters"),
                record(1399735312, 10, "temperature", "celsius"),
                record(1399736512, 200, "distance", "meters"),
                record(1399736512, 20, "temperature", "celsius"),
                record(1399737712, 400, "distance", "meters"),
                record(1399737712, 40, "temperature", "celsius"),
                record(1399739212, 600, "distance", "meters"),
                record(1399739212, 60, "temperature", "celsius"),
            ]
        );
    }

    #[test]
    fn test_decode_record_count_and_offsets() {
        let registry = registry();
        let base: i64 = 1_400_000_000;

        for deltas in [vec![0i64], vec![1, 2], vec![15, 30, 45, 60, 1440]] {
            let mut body = format!("s{base} 1 2");
            for (i, delta) in deltas.iter().enumerate() {
                body.push_str(&format!(";{delta} {} {}", i + 10, i + 20));
            }

            let readings = ReadingDecoder::decode(&registry, SENDER, &body).unwrap();

            assert_eq!(readings.len(), (deltas.len() + 1) * 2);
            assert!(readings.iter().all(|r| r.sensor_type == "Soil" && r.sensor_id == SENDER));
            for (i, delta) in deltas.iter().enumerate() {
                let pair = &readings[(i + 1) * 2..(i + 2) * 2];
                assert_eq!(pair[0].timestamp, base + delta * 60);
                assert_eq!(pair[1].timestamp, base + delta * 60);
                assert_eq!(pair[0].value_type, "moisture");
                assert_eq!(pair[0].value, (i + 10) as i64);
                assert_eq!(pair[1].value_type, "temperature");
                assert_eq!(pair[1].value, (i + 20) as i64);
            }
        }
    }

    #[test]
    fn test_decode_single_value_type() {
        let readings = ReadingDecoder::decode(&registry(), SENDER, "g1399735312 100;1 90;2 80").unwrap();

        let timestamps: Vec<i64> = readings.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![1399735312, 1399735372, 1399735432]);
        assert!(readings.iter().all(|r| r.value_type == "distance" && r.sensor_type == "Gate"));
    }

    #[test]
    fn test_decode_trims_message_whitespace() {
        let readings = ReadingDecoder::decode(&registry(), SENDER, "d  1399735312 100 10;20 200 20 \r\n").unwrap();
        assert_eq!(readings.len(), 4);
    }

    #[test]
    fn test_no_sensor_type_reading() {
        let result = ReadingDecoder::decode(&registry(), SENDER, "1399735312 100 10;20 200 20;40 400 40;65 600 60");
        assert_eq!(result, Err(DecodeError::UnknownSensorType(Some('1'))));
    }

    #[test]
    fn test_unknown_sensor_type() {
        for body in ["x 1399735312 100 10;20 200 20", "Hello, this is a random text message.", " d 1 2 3;4 5 6"] {
            assert!(
                matches!(ReadingDecoder::decode(&registry(), SENDER, body), Err(DecodeError::UnknownSensorType(_))),
                "body {body:?}"
            );
        }
        assert_eq!(
            ReadingDecoder::decode(&registry(), SENDER, ""),
            Err(DecodeError::UnknownSensorType(None))
        );
    }

    #[test]
    fn test_incorrect_sensor_type_reading() {
        let result = ReadingDecoder::decode(&registry(), SENDER, "g 1399735312 100 10;20 200 20;40 400 40;65 600 60");
        assert!(matches!(result, Err(DecodeError::InvalidFormat(_))));
    }

    #[test]
    fn test_garbled_reading() {
        let result =
            ReadingDecoder::decode(&registry(), SENDER, "d 1399735312 100 10;20 200 20;40 400 40;65 600 60123; 23123 23");
        assert!(matches!(result, Err(DecodeError::InvalidFormat(_))));
    }

    #[test]
    fn test_malformed_variants() {
        let bodies = [
            "d 1399735312 100 10",
            "d 1399735312 100;20 200",
            "d 1399735312 100 10 5;20 200 20 5",
            "d 1399735312 100 10;20 200",
            "d 1399735312 100 10;20 200 20 30",
            "d 1399735312 100 10;20 200 2O",
            "d 1399735312 100 10;20 -200 20",
            "d 1399735312  100 10;20 200 20",
            "d 1399735312 100 10;;20 200 20",
            "d 1399735312 100 10;20 200 20;",
            "d 1399735312 100 10 ;20 200 20",
            "d 1399735312 100 10;20 200 20 x",
            "d 99999999999999999999 100 10;20 200 20",
            "d",
        ];

        for body in bodies {
            assert!(
                matches!(ReadingDecoder::decode(&registry(), SENDER, body), Err(DecodeError::InvalidFormat(_))),
                "body {body:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_delta_overflow_rejected() {
        let body = format!("g{} 1;{} 2", i64::MAX - 10, i64::MAX / 60);
        assert!(matches!(
            ReadingDecoder::decode(&registry(), SENDER, &body),
            Err(DecodeError::InvalidFormat(_))
        ));
    }
}
