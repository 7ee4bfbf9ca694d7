use crate::core::{Currency, RateSource};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// In-memory code to `Currency` map, reloaded wholesale from the source.
pub struct CurrencyStore {
    source: Arc<dyn RateSource>,
    currencies: BTreeMap<String, Currency>,
}

impl CurrencyStore {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self {
            source,
            currencies: BTreeMap::new(),
        }
    }

    /// Replaces the whole map. An empty or failed fetch keeps the old one.
    pub async fn load_all(&mut self) -> bool {
        let Some(list) = self.source.fetch_currency_list().await else {
            warn!("Currency list unavailable, keeping {} cached", self.currencies.len());
            return false;
        };
        if list.is_empty() {
            warn!("Currency list is empty, keeping {} cached", self.currencies.len());
            return false;
        }

        self.currencies = list
            .into_iter()
            .map(|(code, name)| (code.clone(), Currency::new(code, name)))
            .collect();
        debug!("Loaded {} currencies", self.currencies.len());
        true
    }

    pub fn get_by_code(&self, code: &str) -> Option<&Currency> {
        self.currencies.get(code)
    }

    /// Codes in sorted order.
    pub fn get_all_codes(&self) -> Vec<&str> {
        self.currencies.keys().map(String::as_str).collect()
    }

    pub fn get_all(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.values()
    }

    pub fn exists(&self, code: &str) -> bool {
        self.currencies.contains_key(code)
    }
}
