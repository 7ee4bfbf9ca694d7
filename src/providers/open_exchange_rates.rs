use crate::core::config::OpenExchangeRatesConfig;
use crate::core::{RateSource, RatesSnapshot};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, error, instrument};

/// `RateSource` backed by the openexchangerates.org REST API.
pub struct OpenExchangeRatesProvider {
    base_url: String,
    app_id: String,
    client: reqwest::Client,
}

impl OpenExchangeRatesProvider {
    pub fn new(config: &OpenExchangeRatesConfig, app_id: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxconv/1.0")
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
            client,
        })
    }

    /// Fetches `endpoint`, adding the `app_id` query parameter when
    /// `authorized`. Errors never carry the credential.
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, authorized: bool) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Requesting {}", url);

        let mut request = self.client.get(&url);
        if authorized {
            request = request.query(&[("app_id", self.app_id.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e.without_url(), url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for URL: {}", response.status(), url));
        }

        let text = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response for {}: {}", url, e.without_url()))?;
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", url, e))
    }
}

#[async_trait]
impl RateSource for OpenExchangeRatesProvider {
    #[instrument(name = "OxrCurrencyList", skip(self))]
    async fn fetch_currency_list(&self) -> Option<HashMap<String, String>> {
        self.get_json("currencies.json", false)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch currency list"))
            .ok()
    }

    #[instrument(name = "OxrLatestRates", skip(self))]
    async fn fetch_latest_rates(&self) -> Option<RatesSnapshot> {
        self.get_json("latest.json", true)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch latest rates"))
            .ok()
    }

    #[instrument(name = "OxrHistoricalRates", skip(self), fields(date = %date))]
    async fn fetch_historical_rates(&self, date: NaiveDate) -> Option<RatesSnapshot> {
        let endpoint = format!("historical/{}.json", date.format("%Y-%m-%d"));
        self.get_json(&endpoint, true)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch historical rates"))
            .ok()
    }
}
