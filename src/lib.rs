pub mod cli;
pub mod core;
pub mod providers;
pub mod service;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::Theme;
use crate::providers::OpenExchangeRatesProvider;
use crate::service::ConversionService;
use crate::store::{HistoryStore, SettingsStore};
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: f64,
        from: Option<String>,
        to: Option<String>,
    },
    Currencies,
    Rates {
        date: Option<NaiveDate>,
        codes: Vec<String>,
    },
    History {
        clear: bool,
    },
    Settings(SettingsCommand),
}

pub enum SettingsCommand {
    Show,
    Set { key: String, value: String },
    Defaults { from: String, to: String },
    Theme(Theme),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let mut service = build_service(&config)?;

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&mut service, amount, from, to).await
        }
        AppCommand::Currencies => cli::currencies::run(&mut service).await,
        AppCommand::Rates { date, codes } => cli::rates::run(&mut service, date, &codes).await,
        AppCommand::History { clear } => cli::history::run(&mut service, clear),
        AppCommand::Settings(cmd) => cli::settings::run(&mut service, cmd),
    }
}

/// Wires the rate source and the on-disk stores. Fails before touching any
/// store when no API credential is configured.
pub fn build_service(config: &AppConfig) -> Result<ConversionService> {
    let app_id = config.resolve_app_id()?;
    let source = OpenExchangeRatesProvider::new(&config.providers.open_exchange_rates, &app_id)?;

    let history = HistoryStore::load(config.history_path()?);
    let settings = SettingsStore::load(config.settings_path()?);
    Ok(ConversionService::new(Arc::new(source), history, settings))
}
