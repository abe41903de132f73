use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use stdfare::{FareConfig, FareQuoteService, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    // optional config path as the only argument
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = FareConfig::load_from_path(config_path).context("Failed to load configuration")?;

    logging::init_logging(&config.logging)?;
    tracing::info!("stdfare {} starting", stdfare::VERSION);

    let service =
        FareQuoteService::from_config(&config).context("Failed to set up external services")?;

    web::run(Arc::new(service), &config).await?;
    Ok(())
}
