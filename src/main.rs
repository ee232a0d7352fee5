//! GST invoice server
//!
//! Usage: `gst-invoice [config.yaml]`

use anyhow::{Context, Result};
use gst_invoice::config::AppConfig;
use gst_invoice::logging;
use gst_invoice::server::{AppState, ServerBuilder};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1);
    let config = AppConfig::load(config_path.as_deref()).context("loading configuration")?;

    logging::init(&config.logging);
    tracing::info!(
        database = %config.database.url,
        wkhtmltopdf = %config.pdf.wkhtmltopdf_path,
        "starting gst-invoice"
    );

    let state = AppState::from_config(config)
        .await
        .context("initializing application state")?;

    ServerBuilder::new(state).serve().await
}
