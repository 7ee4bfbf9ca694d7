//! Scripted `RateSource` for store and service tests

use crate::core::{RateSource, RatesSnapshot};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct FakeRateSource {
    currencies: Mutex<Option<HashMap<String, String>>>,
    latest: Mutex<Option<RatesSnapshot>>,
    pub currency_calls: AtomicUsize,
    pub latest_calls: AtomicUsize,
}

impl FakeRateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source preloaded with `{USD: 1.0, EUR: 0.9, IDR: 15000}` and names.
    pub fn with_usd_base() -> Self {
        let source = Self::new();
        source.set_currencies(Some(HashMap::from([
            ("USD".to_string(), "United States Dollar".to_string()),
            ("EUR".to_string(), "Euro".to_string()),
            ("IDR".to_string(), "Indonesian Rupiah".to_string()),
        ])));
        source.set_rates(&[("USD", 1.0), ("EUR", 0.9), ("IDR", 15000.0)]);
        source
    }

    pub fn set_currencies(&self, currencies: Option<HashMap<String, String>>) {
        *self.currencies.lock().unwrap() = currencies;
    }

    pub fn set_latest(&self, snapshot: Option<RatesSnapshot>) {
        *self.latest.lock().unwrap() = snapshot;
    }

    pub fn set_rates(&self, rates: &[(&str, f64)]) {
        self.set_latest(Some(RatesSnapshot {
            timestamp: Some(1_700_000_000),
            base: Some("USD".to_string()),
            rates: Some(
                rates
                    .iter()
                    .map(|(code, rate)| (code.to_string(), *rate))
                    .collect(),
            ),
        }));
    }
}

#[async_trait]
impl RateSource for FakeRateSource {
    async fn fetch_currency_list(&self) -> Option<HashMap<String, String>> {
        self.currency_calls.fetch_add(1, Ordering::SeqCst);
        self.currencies.lock().unwrap().clone()
    }

    async fn fetch_latest_rates(&self) -> Option<RatesSnapshot> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        self.latest.lock().unwrap().clone()
    }

    async fn fetch_historical_rates(&self, _date: NaiveDate) -> Option<RatesSnapshot> {
        self.latest.lock().unwrap().clone()
    }
}
