use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use interior_studio::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    // The server logs at the configured level; one-shot commands stay quiet unless RUST_LOG says otherwise
    match &command {
        cli::Commands::Start => match config::load_config(&args.config) {
            Ok(cfg) => init_tracing(&cfg.server.log_level, &cfg.server.log_format),
            Err(_) => init_tracing("info", "pretty"),
        },
        _ => init_tracing("warn", "pretty"),
    }

    match command {
        cli::Commands::Start => {
            commands::start::execute(&args.config).await?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Estimate(estimate_args) => {
            commands::estimate::execute(&estimate_args)?;
        }
        cli::Commands::Version => {
            println!("Interior Studio v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
