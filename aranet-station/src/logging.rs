use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::error::StationError;

pub const DATA_DIR_NAME: &str = ".aranet";
pub const LOG_FILE_NAME: &str = "aranet.log";

/// Creates `<station_dir>/.aranet` if needed and returns its path.
pub fn prepare_data_dir(station_dir: &Path) -> Result<PathBuf, StationError> {
    let data_dir = station_dir.join(DATA_DIR_NAME);
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

/// Opens `aranet.log` in append mode without rotation.
pub fn log_file_appender(data_dir: &Path) -> Result<RollingFileAppender, StationError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(data_dir)?;
    Ok(appender)
}

/// Installs the global subscriber. Lines look like
/// `<timestamp> <LEVEL> <message>`; level defaults to `warn`.
pub fn init(data_dir: &Path) -> Result<(), StationError> {
    let appender = log_file_appender(data_dir)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| StationError::Subscriber(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_created_once() {
        let station = tempfile::tempdir().unwrap();
        let first = prepare_data_dir(station.path()).unwrap();
        let second = prepare_data_dir(station.path()).unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with(DATA_DIR_NAME));
        assert!(first.is_dir());
    }

    #[test]
    fn log_lines_are_appended() {
        let station = tempfile::tempdir().unwrap();
        let data_dir = prepare_data_dir(station.path()).unwrap();
        let log_path = data_dir.join(LOG_FILE_NAME);
        std::fs::write(&log_path, "earlier line\n").unwrap();

        let subscriber = tracing_subscriber::fmt()
            .with_writer(log_file_appender(&data_dir).unwrap())
            .with_ansi(false)
            .with_target(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("Unknown metric id '9' on sensor S1");
        });

        let contents = std::fs::read_to_string(&log_path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("earlier line"));
        let logged = lines.next().unwrap();
        assert!(logged.contains(" ERROR "));
        assert!(logged.ends_with("Unknown metric id '9' on sensor S1"));
    }
}
