pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;

pub use api::{CloudClient, RawResponse};
pub use config::CloudConfig;
pub use error::{ErrorKind, StationError};
pub use extract::{FlatReadings, extract};

/// Fetches the latest sensor readings and flattens them.
pub async fn latest_readings(config: &CloudConfig) -> Result<FlatReadings, StationError> {
    let client = CloudClient::new(config)?;
    let raw = client.fetch_sensors().await?;
    extract(&raw)
}
