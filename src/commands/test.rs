use anyhow::Result;
use colored::{ColoredString, Colorize};
use interior_studio::config;
use std::path::Path;
use tracing::info;

/// Validate the configuration file and print a summary without starting the server
pub fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Testing configuration...".yellow());
    info!("Loading and validating configuration");

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration test successful".green());
    println!();

    println!("{}", "Configuration Summary:".bold());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!("  {}: {}", "Log Level".cyan(), cfg.server.log_level);
    println!("  {}: {}", "Log Format".cyan(), cfg.server.log_format);
    println!();

    println!("  {}: {} free, cached {}h", "Credits".cyan(), cfg.credits.initial_credits, cfg.credits.cache_ttl_hours);
    println!("  {}: {} characters", "Share ids".cyan(), cfg.share.id_length);
    println!();

    println!("{}", "Integrations:".cyan());
    println!(
        "    Generation: {} ({})",
        status(cfg.generation.enabled),
        cfg.generation.model
    );
    println!(
        "    Payments: {} ({} {} for {} credits)",
        status(cfg.stripe.enabled),
        format_price(cfg.stripe.price_cents),
        cfg.stripe.currency.to_uppercase(),
        cfg.stripe.credits_per_purchase
    );
    println!("    Accounts: {}", status(cfg.auth.enabled));
    println!();

    println!("  {}: {}", "Metrics".cyan(), status(cfg.metrics.enabled));
    if cfg.metrics.enabled {
        println!("    Endpoint: {}", cfg.metrics.endpoint);
    }

    info!("Configuration validation completed successfully");
    Ok(())
}

fn status(enabled: bool) -> ColoredString {
    if enabled {
        "enabled".green()
    } else {
        "disabled".red()
    }
}

fn format_price(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(499), "4.99");
        assert_eq!(format_price(1000), "10.00");
        assert_eq!(format_price(5), "0.05");
    }
}
