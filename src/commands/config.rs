use anyhow::Result;
use colored::Colorize;
use interior_studio::config::{self, Config};
use interior_studio::logging::mask_secret;
use std::path::Path;
use tracing::info;

/// Print the configuration as TOML with secrets masked
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config(config_path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", toml::to_string_pretty(&sanitized)?);

    Ok(())
}

pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file");

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Enabled integrations: {}", count_enabled_integrations(&cfg));
    println!("  Free credits per owner: {}", cfg.credits.initial_credits);

    Ok(())
}

fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    sanitized.generation.api_key = mask_secret(&sanitized.generation.api_key);
    sanitized.stripe.secret_key = mask_secret(&sanitized.stripe.secret_key);
    sanitized.stripe.webhook_secret = mask_secret(&sanitized.stripe.webhook_secret);
    sanitized.auth.anon_key = mask_secret(&sanitized.auth.anon_key);
    sanitized
}

fn count_enabled_integrations(cfg: &Config) -> usize {
    [cfg.generation.enabled, cfg.stripe.enabled, cfg.auth.enabled]
        .into_iter()
        .filter(|enabled| *enabled)
        .count()
}
