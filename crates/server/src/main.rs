mod bootstrap;
mod console;

use anyhow::Result;
use printquote_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use printquote_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    if config.bot.has_token() {
        tracing::warn!(
            "bot token configured but no platform binding is built in; serving the console transport"
        );
    }

    let app = bootstrap::bootstrap_with_config(config, console::ConsoleTransport::default())?;
    tracing::info!(transport_mode = "console", "printquote-server started");

    console::run(&app.dispatcher).await?;

    tracing::info!("printquote-server stopping");
    Ok(())
}
