//! Exchange rate feed abstraction

use super::model::RatesSnapshot;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Upstream feed of currencies and base-relative rates.
///
/// Implementations swallow transport and decoding failures: they log a
/// diagnostic and return `None`.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Code to display name for every currency the feed knows.
    async fn fetch_currency_list(&self) -> Option<HashMap<String, String>>;

    async fn fetch_latest_rates(&self) -> Option<RatesSnapshot>;

    async fn fetch_historical_rates(&self, date: NaiveDate) -> Option<RatesSnapshot>;
}
