use super::currency::CurrencyStore;
use crate::core::{Currency, Rate, RateSource, RatesSnapshot};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// In-memory code to `Rate` map relative to the upstream base currency.
///
/// Refreshes are all-or-nothing: the map is rebuilt from the new payload
/// or left exactly as it was.
pub struct RateStore {
    source: Arc<dyn RateSource>,
    rates: HashMap<String, Rate>,
    base: Option<String>,
}

impl RateStore {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self {
            source,
            rates: HashMap::new(),
            base: None,
        }
    }

    /// Fetches the latest rates and rebuilds the map, naming each entry via
    /// `currencies`.
    pub async fn refresh_all(&mut self, currencies: &CurrencyStore) -> bool {
        let Some(snapshot) = self.source.fetch_latest_rates().await else {
            warn!("Latest rates unavailable, keeping {} cached", self.rates.len());
            return false;
        };
        let base = snapshot.base.clone();
        let Some(rates) = rates_from_snapshot(snapshot, currencies) else {
            warn!("Rates payload has no rates field, keeping {} cached", self.rates.len());
            return false;
        };

        debug!("Refreshed {} rates", rates.len());
        self.rates = rates;
        self.base = base;
        true
    }

    pub fn get_by_code(&self, code: &str) -> Option<&Rate> {
        self.rates.get(code)
    }

    pub fn exists(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn get_all(&self) -> impl Iterator<Item = &Rate> {
        self.rates.values()
    }

    /// Base currency reported by the last successful refresh.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Turns a payload into rate records, or `None` if it has no rates field.
///
/// Names come from `currencies`, falling back to the bare code. Non-positive
/// and non-finite rates are not convertible and are left out.
pub fn rates_from_snapshot(
    snapshot: RatesSnapshot,
    currencies: &CurrencyStore,
) -> Option<HashMap<String, Rate>> {
    let updated_at = snapshot.updated_at();
    let raw_rates = snapshot.rates?;

    let mut rates = HashMap::with_capacity(raw_rates.len());
    for (code, value) in raw_rates {
        if !value.is_finite() || value <= 0.0 {
            debug!(%code, value, "Skipping non-convertible rate");
            continue;
        }
        let currency = currencies
            .get_by_code(&code)
            .cloned()
            .unwrap_or_else(|| Currency::new(code.clone(), code.clone()));
        rates.insert(code, Rate::new(currency, value, updated_at));
    }
    Some(rates)
}
