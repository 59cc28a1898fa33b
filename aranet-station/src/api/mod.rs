use reqwest::StatusCode;
use tracing::{debug, info};

use crate::{config::CloudConfig, error::StationError};

mod response;

pub use response::{Metric, RawResponse, SensorPage, SensorRecord, TelemetryEntry};

const USER_AGENT: &str = concat!("aranet-station/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "ApiKey";
const SENSOR_FIELDS: &str = "name,metrics,telemetry";

/// Client for the Aranet cloud REST API.
pub struct CloudClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    space_id: Option<String>,
}

impl CloudClient {
    pub fn new(config: &CloudConfig) -> Result<Self, StationError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            space_id: config.space_id.clone(),
        })
    }

    /// Fetches the latest readings of every sensor visible to the API key.
    pub async fn fetch_sensors(&self) -> Result<RawResponse, StationError> {
        let url = format!("{}/sensors/last", self.endpoint);
        let mut query = vec![("fields", SENSOR_FIELDS)];
        if let Some(space) = &self.space_id {
            query.push(("space", space.as_str()));
        }

        debug!("Requesting {url}");
        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StationError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let raw: RawResponse = serde_json::from_str(&body)?;
        info!("Fetched {} sensors", raw.sensors().len());
        Ok(raw)
    }
}
