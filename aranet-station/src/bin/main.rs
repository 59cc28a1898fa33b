use std::io::Write;
use std::path::Path;

use aranet_station::{
    config::{self, CloudConfig},
    error::StationError,
    latest_readings, logging,
};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let station_dir = match config::station_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Cannot locate station directory: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::prepare_data_dir(&station_dir).and_then(|dir| logging::init(&dir)) {
        eprintln!("Cannot set up logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&station_dir).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(station_dir: &Path) -> Result<(), StationError> {
    let config = CloudConfig::from_file(station_dir.join(config::CONFIG_FILE_NAME))?;
    info!("Querying {}", config.endpoint);

    let readings = latest_readings(&config).await?;
    let line = serde_json::to_string(&readings)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")?;
    stdout.flush()?;
    Ok(())
}
