//! Flattening of a cloud response into a single-level mapping.
//!
//! Every sensor contributes `<name>_time` (timestamp of its first metric),
//! one `<name>_<metric>` key per metric and one `<name>_<telemetry>` key per
//! telemetry entry. The mapping also carries `num_sensors`.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    api::{RawResponse, SensorRecord},
    error::StationError,
};

/// Metric codes reported by the cloud and the names used in output keys.
pub const METRIC_NAMES: &[(&str, &str)] = &[
    ("1", "temperature"),
    ("2", "humidity"),
    ("3", "CO2"),
    ("4", "pressure"),
];

/// Telemetry codes reported by the cloud and the names used in output keys.
pub const TELEMETRY_NAMES: &[(&str, &str)] = &[("61", "battery"), ("62", "RSSI")];

pub const NUM_SENSORS_KEY: &str = "num_sensors";

fn lookup(table: &[(&str, &'static str)], id: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(code, _)| *code == id)
        .map(|(_, name)| *name)
}

pub fn metric_name(id: &str) -> Option<&'static str> {
    lookup(METRIC_NAMES, id)
}

pub fn telemetry_name(id: &str) -> Option<&'static str> {
    lookup(TELEMETRY_NAMES, id)
}

/// Flat `key -> value` readings, serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlatReadings(Map<String, Value>);

impl FlatReadings {
    pub fn num_sensors(&self) -> Option<u64> {
        self.0.get(NUM_SENSORS_KEY).and_then(Value::as_u64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn insert(&mut self, sensor: &str, field: &str, value: Value) {
        self.0.insert(format!("{sensor}_{field}"), value);
    }
}

/// Flattens `raw` into [`FlatReadings`].
///
/// Sensors are visited in input order, so a later sensor sharing a name with
/// an earlier one overwrites its keys. Fails on the first unknown metric or
/// telemetry code, and on any sensor without metrics or whose first metric
/// has no timestamp.
pub fn extract(raw: &RawResponse) -> Result<FlatReadings, StationError> {
    let sensors = raw.sensors();
    let mut readings = FlatReadings::default();
    readings
        .0
        .insert(NUM_SENSORS_KEY.to_string(), Value::from(sensors.len()));

    for sensor in sensors {
        debug!("Flattening sensor: {sensor}");
        extract_sensor(sensor, &mut readings)?;
    }

    Ok(readings)
}

fn extract_sensor(sensor: &SensorRecord, readings: &mut FlatReadings) -> Result<(), StationError> {
    let name = sensor.name.as_str();
    let first = sensor
        .metrics
        .first()
        .ok_or_else(|| StationError::NoMetrics(name.to_string()))?;
    let time = first
        .timestamp
        .clone()
        .ok_or_else(|| StationError::MissingTimestamp(name.to_string()))?;
    readings.insert(name, "time", Value::String(time));

    for metric in &sensor.metrics {
        let field = metric_name(&metric.id).ok_or_else(|| StationError::UnknownMetric {
            sensor: name.to_string(),
            id: metric.id.clone(),
        })?;
        readings.insert(name, field, metric.value.clone());
    }

    for entry in &sensor.telemetry {
        let field = telemetry_name(&entry.id).ok_or_else(|| StationError::UnknownTelemetry {
            sensor: name.to_string(),
            id: entry.id.clone(),
        })?;
        readings.insert(name, field, entry.value.clone());
    }

    Ok(())
}
