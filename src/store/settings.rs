use super::disk::{load_json, save_json};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

pub const DEFAULT_FROM_CURRENCY: &str = "default_from_currency";
pub const DEFAULT_TO_CURRENCY: &str = "default_to_currency";
pub const THEME: &str = "theme";

pub fn default_settings() -> BTreeMap<String, Value> {
    BTreeMap::from([
        (DEFAULT_FROM_CURRENCY.to_string(), Value::from("USD")),
        (DEFAULT_TO_CURRENCY.to_string(), Value::from("EUR")),
        (THEME.to_string(), Value::from("light")),
    ])
}

/// Open key-value preferences seeded with defaults and saved on every set.
pub struct SettingsStore {
    path: PathBuf,
    settings: BTreeMap<String, Value>,
}

impl SettingsStore {
    /// Seeds defaults, then merges the persisted values over them. A missing
    /// file is created from the defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let mut store = Self {
            path: path.as_ref().to_path_buf(),
            settings: default_settings(),
        };

        match load_json::<BTreeMap<String, Value>>(&store.path) {
            Ok(Some(saved)) => {
                debug!("Merging {} saved settings", saved.len());
                store.settings.extend(saved);
            }
            Ok(None) => store.save(),
            Err(e) => error!(error = ?e, "Error loading settings, using defaults"),
        }

        store
    }

    pub fn get(&self, key: &str, default: Value) -> Value {
        self.settings.get(key).cloned().unwrap_or(default)
    }

    /// String value of `key`, or `default` if it is missing or not a string.
    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.settings
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.settings.insert(key.to_string(), value.into());
        self.save();
    }

    pub fn get_all(&self) -> BTreeMap<String, Value> {
        self.settings.clone()
    }

    fn save(&self) {
        if let Err(e) = save_json(&self.path, &self.settings) {
            error!(error = ?e, "Error saving settings");
        }
    }
}
