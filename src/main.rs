//! Binary entry point: load settings, set up logging, run the server.

use tracing::{error, info, warn};

use signpost::config::{LoadStatus, Settings};
use signpost::transport::Server;
use signpost::utils::logging;

const DEFAULT_CONFIG_PATH: &str = "signpost.toml";

#[tokio::main]
async fn main() -> signpost::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let (settings, load_status) = Settings::load_or_default(&path);
    logging::init(&settings.logging);

    match load_status {
        LoadStatus::Loaded => info!(path = %path, "configuration loaded"),
        LoadStatus::CreatedDefault => {
            warn!(path = %path, "could not find configuration file, creating a new one");
        }
        LoadStatus::CreateFailed(e) => {
            error!(path = %path, error = %e, "could not save default configuration");
        }
        LoadStatus::Invalid(e) => {
            warn!(path = %path, error = %e, "error occurred while loading configuration file, using defaults");
        }
    }

    settings.validate_strict()?;

    let server = Server::bind(settings.snapshot()?).await?;
    server.run().await
}
