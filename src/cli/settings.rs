use super::ui;
use crate::SettingsCommand;
use crate::core::{ConversionError, Theme};
use crate::service::ConversionService;
use anyhow::Result;
use comfy_table::Cell;
use serde_json::Value;
use std::collections::BTreeMap;

pub fn display_as_table(settings: &BTreeMap<String, Value>, theme: Theme) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Setting", theme),
        ui::header_cell("Value", theme),
    ]);

    for (key, value) in settings {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }

    table.to_string()
}

pub fn run(service: &mut ConversionService, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => {}
        SettingsCommand::Set { key, value } => {
            if key.trim().is_empty() {
                return Err(ConversionError::Validation(
                    "Setting name must not be empty".to_string(),
                )
                .into());
            }
            service.update_setting(&key, value);
        }
        SettingsCommand::Defaults { from, to } => {
            service.set_default_currencies(&from.to_uppercase(), &to.to_uppercase());
        }
        SettingsCommand::Theme(theme) => service.set_theme(theme),
    }

    println!("{}", display_as_table(&service.settings(), service.theme()));
    Ok(())
}
