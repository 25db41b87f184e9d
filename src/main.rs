use std::{sync::Arc, time::Duration};

use color_eyre::eyre::Result;
use dotenv::dotenv;
use slotwise_api::config::ApiConfig;
use slotwise_backend::BackendClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Create the backend client
    let client = BackendClient::new(
        &config.backend_url,
        config.backend_token.as_deref(),
        Duration::from_secs(config.request_timeout),
    )?;

    // Start API server
    slotwise_api::start_server(config, Arc::new(client)).await?;

    Ok(())
}
