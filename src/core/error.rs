//! Failure kinds surfaced by the conversion service

use thiserror::Error;

/// Every variant renders as a short reason suitable for showing to a user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("{0}")]
    DataUnavailable(String),
    #[error("{0}")]
    Validation(String),
    #[error("Exchange rate not found for {code}")]
    RateNotFound { code: String },
    #[error("Conversion error: {0}")]
    ConversionFault(String),
}

impl ConversionError {
    /// Whether retrying after a refresh may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConversionError::DataUnavailable(_) | ConversionError::RateNotFound { .. }
        )
    }
}
