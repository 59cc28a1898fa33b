use serde::Deserialize;
use serde_json::Value;

/// Body of the cloud `sensors/last` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResponse {
    pub data: SensorPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorPage {
    pub items: Vec<SensorRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorRecord {
    pub name: String,
    pub metrics: Vec<Metric>,
    pub telemetry: Vec<TelemetryEntry>,
}

/// One environmental reading. Only the first metric of a sensor has to
/// carry `t`.
#[derive(Debug, Clone, Deserialize)]
pub struct Metric {
    pub id: String,
    #[serde(rename = "v", with = "numeric_string")]
    pub value: Value,
    #[serde(rename = "t", default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryEntry {
    pub id: String,
    #[serde(rename = "v", with = "numeric_string")]
    pub value: Value,
}

impl RawResponse {
    pub fn sensors(&self) -> &[SensorRecord] {
        &self.data.items
    }
}

impl std::fmt::Display for SensorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - metrics: {}, telemetry: {}",
            self.name,
            self.metrics.len(),
            self.telemetry.len()
        )
    }
}

/// Passes `v` through untouched, except that numeric strings become numbers.
mod numeric_string {
    use serde::{Deserialize, Deserializer};
    use serde_json::{Number, Value};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(as_string) => match parse_number(as_string.trim()) {
                Some(n) => Value::Number(n),
                None => {
                    tracing::debug!("Keeping non-numeric sensor value '{as_string}' as text");
                    Value::String(as_string)
                }
            },
            other => other,
        })
    }

    fn parse_number(s: &str) -> Option<Number> {
        if let Ok(int) = s.parse::<i64>() {
            return Some(int.into());
        }
        s.parse::<f64>().ok().and_then(Number::from_f64)
    }
}
