//! Stores backing the conversion service
//!
//! Currencies and rates live in memory and are refreshed wholesale from a
//! `RateSource`; history and settings are JSON files on disk. None of the
//! stores lock: callers serialize access.

pub mod currency;
pub mod disk;
pub mod history;
pub mod rate;
pub mod settings;

#[cfg(test)]
pub(crate) mod testing;

pub use currency::CurrencyStore;
pub use history::HistoryStore;
pub use rate::RateStore;
pub use settings::SettingsStore;
