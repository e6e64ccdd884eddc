use clap::{Args, Parser, Subcommand};
use interior_studio::estimate::Tier;
use interior_studio::i18n::Language;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "studio", version, about = "Interior design studio backend")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true, env = "STUDIO_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server (default)
    Start,

    /// Test configuration file validity
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Price a project from the command line
    Estimate(EstimateArgs),

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,

    /// Validate configuration file
    Validate,
}

#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Floor area in m²
    #[arg(short, long)]
    pub area: f64,

    /// Price tier: budget, standard or premium
    #[arg(short, long, default_value = "standard", value_parser = parse_tier)]
    pub tier: Tier,

    /// Kitchen joinery length in meters
    #[arg(long, default_value_t = 0.0)]
    pub kitchen: f64,

    /// Wardrobe length in meters
    #[arg(long, default_value_t = 0.0)]
    pub wardrobe: f64,

    /// Include renovation preparation
    #[arg(long)]
    pub renovation: bool,

    /// Rush delivery (+20% per component)
    #[arg(long)]
    pub urgent: bool,

    /// Leave out space planning
    #[arg(long)]
    pub no_space_planning: bool,

    /// Leave out interior finishes
    #[arg(long)]
    pub no_finishes: bool,

    /// Leave out furnishing and decor
    #[arg(long)]
    pub no_furnishing: bool,

    /// Label language (en, de)
    #[arg(short, long, default_value = "en", value_parser = parse_language)]
    pub language: Language,

    /// Print the raw JSON result instead of a table
    #[arg(long)]
    pub json: bool,
}

fn parse_tier(value: &str) -> Result<Tier, String> {
    value.parse()
}

fn parse_language(value: &str) -> Result<Language, String> {
    value.parse()
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}
