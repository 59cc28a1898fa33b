use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::StationError;

pub const CONFIG_FILE_NAME: &str = "aranet_cloud.conf";
pub const STATION_DIR_VAR: &str = "ARANET_STATION_DIR";

const API_KEY: &str = "ARANET_API_KEY";
const ENDPOINT: &str = "ARANET_ENDPOINT";
const SPACE_ID: &str = "ARANET_SPACE_ID";
const TIMEOUT_SECS: &str = "ARANET_TIMEOUT_SECS";

const DEFAULT_ENDPOINT: &str = "https://aranet.cloud/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct CloudConfig {
    pub endpoint: String,
    pub api_key: String,
    pub space_id: Option<String>,
    pub timeout: Duration,
}

impl CloudConfig {
    /// Loads `path` (dotenv syntax). Variables already set in the process
    /// environment take precedence over the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StationError> {
        let file_vars = read_file_vars(path)?;
        Self::from_vars(&file_vars, |key| std::env::var(key).ok())
    }

    pub fn from_vars(
        file_vars: &HashMap<String, String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, StationError> {
        let var = |key: &str| {
            env(key)
                .or_else(|| file_vars.get(key).cloned())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = var(API_KEY).ok_or(StationError::MissingConfig(API_KEY))?;
        let endpoint = var(ENDPOINT)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeout_secs = match var(TIMEOUT_SECS) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(StationError::InvalidConfig {
                    key: TIMEOUT_SECS,
                    value: raw,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint,
            api_key,
            space_id: var(SPACE_ID),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Parses a dotenv-syntax file without touching the process environment.
pub fn read_file_vars(path: impl AsRef<Path>) -> Result<HashMap<String, String>, StationError> {
    let path = path.as_ref();
    let config_error = |source| StationError::Config {
        path: path.to_path_buf(),
        source,
    };

    let mut file_vars = HashMap::new();
    for item in dotenvy::from_filename_iter(path).map_err(config_error)? {
        let (key, value) = item.map_err(config_error)?;
        file_vars.insert(key, value);
    }
    Ok(file_vars)
}

/// Directory holding the config file and the `.aranet` data folder.
pub fn station_dir() -> Result<PathBuf, StationError> {
    if let Some(dir) = std::env::var_os(STATION_DIR_VAR) {
        return Ok(PathBuf::from(dir));
    }
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        StationError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "executable has no parent directory",
        ))
    })
}
