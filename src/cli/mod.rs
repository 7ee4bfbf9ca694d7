//! Command line presentation on top of `ConversionService`

pub mod convert;
pub mod currencies;
pub mod history;
pub mod rates;
pub mod settings;
pub mod setup;
pub mod ui;

use crate::core::ConversionError;
use crate::service::ConversionService;
use anyhow::Result;

/// Loads currencies and rates behind a spinner.
pub async fn load_data(service: &mut ConversionService) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = service.initialize().await;
    pb.finish_and_clear();
    Ok(result?)
}

/// Styled reason for failures caused by the user's input, or `None` when
/// the failure is a system fault.
pub fn input_error_message(err: &anyhow::Error) -> Option<String> {
    match err.downcast_ref::<ConversionError>()? {
        ConversionError::Validation(_) | ConversionError::RateNotFound { .. } => {
            Some(ui::style_text(&err.to_string(), ui::StyleType::Error))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(message: Option<String>) -> Option<String> {
        message.map(|m| console::strip_ansi_codes(&m).to_string())
    }

    #[test]
    fn test_input_errors_are_reported_as_reasons() {
        let err = anyhow::Error::from(ConversionError::Validation(
            "Amount must be positive".to_string(),
        ));
        assert_eq!(
            plain(input_error_message(&err)).as_deref(),
            Some("Amount must be positive")
        );

        let err = anyhow::Error::from(ConversionError::RateNotFound {
            code: "XYZ".to_string(),
        });
        assert_eq!(
            plain(input_error_message(&err)).as_deref(),
            Some("Exchange rate not found for XYZ")
        );
    }

    #[test]
    fn test_system_faults_are_not_input_errors() {
        let err = anyhow::Error::from(ConversionError::DataUnavailable(
            "Failed to load exchange rates".to_string(),
        ));
        assert!(input_error_message(&err).is_none());

        let err = anyhow::anyhow!("Failed to read config file");
        assert!(input_error_message(&err).is_none());
    }
}
