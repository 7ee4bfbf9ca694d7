use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::core::Theme;
use fxconv::core::log::init_logging;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Source currency code, defaults to the saved preference
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency code, defaults to the saved preference
        #[arg(short, long)]
        to: Option<String>,
    },
    /// List available currencies
    Currencies,
    /// Show exchange rates relative to the base currency
    Rates {
        /// Show rates published on this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Only show these currency codes
        codes: Vec<String>,
    },
    /// Show conversion history
    History {
        /// Delete all history entries
        #[arg(long)]
        clear: bool,
    },
    /// Show or change preferences
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show all preferences
    Show,
    /// Set a preference value
    Set { key: String, value: String },
    /// Set the default currencies used by convert
    Defaults { from: String, to: String },
    /// Set the color theme (light or dark)
    Theme { theme: Theme },
}

impl From<SettingsCommands> for fxconv::SettingsCommand {
    fn from(cmd: SettingsCommands) -> fxconv::SettingsCommand {
        match cmd {
            SettingsCommands::Show => fxconv::SettingsCommand::Show,
            SettingsCommands::Set { key, value } => fxconv::SettingsCommand::Set { key, value },
            SettingsCommands::Defaults { from, to } => {
                fxconv::SettingsCommand::Defaults { from, to }
            }
            SettingsCommands::Theme { theme } => fxconv::SettingsCommand::Theme(theme),
        }
    }
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                fxconv::AppCommand::Convert { amount, from, to }
            }
            Commands::Currencies => fxconv::AppCommand::Currencies,
            Commands::Rates { date, codes } => fxconv::AppCommand::Rates { date, codes },
            Commands::History { clear } => fxconv::AppCommand::History { clear },
            Commands::Settings { command } => fxconv::AppCommand::Settings(
                command.map_or(fxconv::SettingsCommand::Show, Into::into),
            ),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // A missing .env file is fine; APP_ID may come from the environment or config
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => match fxconv::cli::input_error_message(&e) {
            Some(reason) => {
                tracing::debug!(error = %e, "Rejected input");
                eprintln!("{reason}");
                Ok(ExitCode::FAILURE)
            }
            None => {
                tracing::error!(error = %e, "Application failed");
                Err(e)
            }
        },
    }
}
