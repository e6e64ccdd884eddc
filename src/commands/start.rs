use anyhow::{Context, Result};
use colored::Colorize;
use interior_studio::{config, server};
use std::path::Path;
use tracing::info;

/// Load configuration and serve until shutdown
pub async fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Starting interior studio...".green());

    let cfg = config::load_config(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    info!(config = %config_path.display(), "Configuration loaded");

    server::start_server(cfg, config_path.to_path_buf()).await
}
