/// Coarse classification of a [`StationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Fetch,
    Lookup,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum StationError {
    #[error("Cannot read config file {}: {source}", path.display())]
    Config {
        path: std::path::PathBuf,
        source: dotenvy::Error,
    },
    #[error("Missing config key: {0}")]
    MissingConfig(&'static str),
    #[error("Invalid value for config key {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },
    #[error("Error communicating with the cloud API: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Cloud API rejected the API key ({0})")]
    Unauthorized(u16),
    #[error("Cloud API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Unknown metric id '{id}' on sensor {sensor}")]
    UnknownMetric { sensor: String, id: String },
    #[error("Unknown telemetry id '{id}' on sensor {sensor}")]
    UnknownTelemetry { sensor: String, id: String },
    #[error("Sensor {0} reported no metrics")]
    NoMetrics(String),
    #[error("First metric of sensor {0} has no timestamp")]
    MissingTimestamp(String),
    #[error("Malformed sensor response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Log file setup error: {0}")]
    LogInit(#[from] tracing_appender::rolling::InitError),
    #[error("Logger already installed: {0}")]
    Subscriber(String),
}

impl StationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StationError::Config { .. }
            | StationError::MissingConfig(_)
            | StationError::InvalidConfig { .. } => ErrorKind::Config,
            StationError::Network(_) | StationError::Unauthorized(_) | StationError::Api { .. } => {
                ErrorKind::Fetch
            }
            StationError::UnknownMetric { .. }
            | StationError::UnknownTelemetry { .. }
            | StationError::NoMetrics(_)
            | StationError::MissingTimestamp(_)
            | StationError::Malformed(_) => ErrorKind::Lookup,
            StationError::Io(_) | StationError::LogInit(_) | StationError::Subscriber(_) => {
                ErrorKind::Io
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_failures_share_a_kind() {
        let unknown = StationError::UnknownMetric {
            sensor: "S1".to_string(),
            id: "9".to_string(),
        };
        assert_eq!(unknown.kind(), ErrorKind::Lookup);
        assert_eq!(StationError::NoMetrics("S1".into()).kind(), ErrorKind::Lookup);

        let malformed = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(StationError::from(malformed).kind(), ErrorKind::Lookup);
    }

    #[test]
    fn messages_name_the_offender() {
        let err = StationError::UnknownTelemetry {
            sensor: "Office".to_string(),
            id: "63".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown telemetry id '63' on sensor Office");
        assert_eq!(
            StationError::MissingConfig("ARANET_API_KEY").kind(),
            ErrorKind::Config
        );

        let unreadable = StationError::Config {
            path: "/srv/station/aranet_cloud.conf".into(),
            source: dotenvy::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "path not found",
            )),
        };
        assert_eq!(unreadable.kind(), ErrorKind::Config);
        assert!(
            unreadable
                .to_string()
                .starts_with("Cannot read config file /srv/station/aranet_cloud.conf: ")
        );
    }
}
