//! caltrack CLI
//!
//! Command-line interface for caltrack - a daily calorie list.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use caltrack_core::Config;

mod commands;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "caltrack")]
#[command(about = "caltrack - Track meals and their calories")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to an alternative config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Add an item
    Add {
        /// Meal name
        name: String,
        /// Calorie count
        #[arg(allow_hyphen_values = true)]
        calories: String,
    },
    /// List all items with the total
    #[command(alias = "ls")]
    List,
    /// Edit an item
    Edit {
        /// Item ID
        id: u64,
        /// New meal name
        #[arg(short, long)]
        name: Option<String>,
        /// New calorie count
        #[arg(short, long, allow_hyphen_values = true)]
        calories: Option<String>,
    },
    /// Delete an item
    #[command(alias = "rm")]
    Delete {
        /// Item ID
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every item
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the total calories
    Total,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work on the file itself, before anything is opened
    if let Some(Commands::Config { command }) = &cli.command {
        init_cli_logging();
        return match command.clone().unwrap_or(ConfigCommands::Show) {
            ConfigCommands::Show => commands::config::show(config_path, &output),
            ConfigCommands::Set { key, value } => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config = Config::load_with_cli_override(config_path)?;

    // TUI is the default when no command is given
    let command = match cli.command {
        None | Some(Commands::Tui) => return tui::run(&config),
        Some(command) => command,
    };

    init_cli_logging();

    match command {
        Commands::Add { name, calories } => commands::item::add(&config, name, calories, &output),
        Commands::List => commands::item::list(&config, &output),
        Commands::Edit { id, name, calories } => {
            commands::item::edit(&config, id, name, calories, &output)
        }
        Commands::Delete { id, yes } => commands::item::delete(&config, id, yes, &output),
        Commands::Clear { yes } => commands::item::clear(&config, yes, &output),
        Commands::Total => commands::item::total(&config, &output),
        Commands::Tui | Commands::Config { .. } => Ok(()),
    }
}

/// Log to stderr for one-shot commands
///
/// Filter comes from CALTRACK_LOG and defaults to `warn`.
fn init_cli_logging() {
    let filter = EnvFilter::try_from_env("CALTRACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
