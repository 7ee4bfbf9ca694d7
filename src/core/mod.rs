//! Core business abstractions

pub mod config;
pub mod error;
pub mod format;
pub mod log;
pub mod model;
pub mod source;

// Re-export main types for cleaner imports
pub use error::ConversionError;
pub use model::{Currency, Rate, RatesSnapshot, Theme, Transaction};
pub use source::RateSource;
