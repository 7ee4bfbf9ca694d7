//! Conversion service: the only entry point the presentation layer uses.

use crate::core::format::{format_conversion, format_rate_info};
use crate::core::{ConversionError, Currency, Rate, RateSource, Theme, Transaction};
use crate::store::rate::rates_from_snapshot;
use crate::store::settings::{DEFAULT_FROM_CURRENCY, DEFAULT_TO_CURRENCY, THEME};
use crate::store::{CurrencyStore, HistoryStore, RateStore, SettingsStore};
use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub converted_amount: f64,
    /// Effective rate, `converted_amount / amount`.
    pub rate: f64,
    /// Display string such as `1 USD = 0.9000 EUR`.
    pub rate_info: String,
}

/// Rates published for a past date.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRates {
    /// Base currency of that day's payload.
    pub base: Option<String>,
    /// Sorted by code.
    pub rates: Vec<Rate>,
}

pub struct ConversionService {
    source: Arc<dyn RateSource>,
    currencies: CurrencyStore,
    rates: RateStore,
    history: HistoryStore,
    settings: SettingsStore,
}

impl ConversionService {
    pub fn new(source: Arc<dyn RateSource>, history: HistoryStore, settings: SettingsStore) -> Self {
        Self {
            currencies: CurrencyStore::new(Arc::clone(&source)),
            rates: RateStore::new(Arc::clone(&source)),
            source,
            history,
            settings,
        }
    }

    /// Loads currencies, then rates, so rate records pick up display names
    /// on the same pass.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> Result<(), ConversionError> {
        if !self.currencies.load_all().await {
            return Err(ConversionError::DataUnavailable(
                "Failed to load currency list".to_string(),
            ));
        }
        self.refresh_rates().await?;
        info!("Data loaded successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn refresh_rates(&mut self) -> Result<(), ConversionError> {
        if self.rates.refresh_all(&self.currencies).await {
            if self.rates.is_empty() {
                warn!("Rates feed is empty, no currency is convertible");
            } else {
                debug!("Rates refreshed successfully");
            }
            Ok(())
        } else {
            Err(ConversionError::DataUnavailable(
                "Failed to load exchange rates".to_string(),
            ))
        }
    }

    /// Converts `amount` of `from_code` into `to_code` through the base
    /// currency and records the result in history.
    pub fn convert(
        &mut self,
        from_code: &str,
        to_code: &str,
        amount: f64,
    ) -> Result<Conversion, ConversionError> {
        if from_code.is_empty() || to_code.is_empty() {
            return Err(ConversionError::Validation(
                "Please select both currencies".to_string(),
            ));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ConversionError::Validation(
                "Amount must be positive".to_string(),
            ));
        }

        let from_rate = self.lookup_rate(from_code)?;
        let to_rate = self.lookup_rate(to_code)?;
        let (result, rate) = convert_through_base(amount, from_rate, to_rate)?;

        let conversion = Conversion {
            converted_amount: result,
            rate,
            rate_info: format_rate_info(from_code, to_code, rate),
        };
        debug!(from_code, to_code, amount, result, "Converted");

        self.history.add(Transaction {
            from_currency: from_code.to_string(),
            to_currency: to_code.to_string(),
            amount,
            result,
            rate,
            timestamp: Local::now().fixed_offset(),
        });

        Ok(conversion)
    }

    fn lookup_rate(&self, code: &str) -> Result<f64, ConversionError> {
        self.rates
            .get_by_code(code)
            .map(Rate::rate)
            .ok_or_else(|| ConversionError::RateNotFound {
                code: code.to_string(),
            })
    }

    /// `(code, name)` pairs sorted by code.
    pub fn get_available_currencies(&self) -> Vec<(String, String)> {
        self.currencies
            .get_all()
            .map(|c| (c.code().to_string(), c.name().to_string()))
            .collect()
    }

    pub fn currency_name(&self, code: &str) -> String {
        self.currencies
            .get_by_code(code)
            .map_or_else(|| code.to_string(), |c| c.name().to_string())
    }

    pub fn rate_info(&self, code: &str) -> Option<&Rate> {
        self.rates.get_by_code(code)
    }

    pub fn base_currency(&self) -> Option<&str> {
        self.rates.base()
    }

    /// Current rates sorted by code.
    pub fn all_rates(&self) -> Vec<&Rate> {
        let mut rates: Vec<&Rate> = self.rates.get_all().collect();
        rates.sort_by(|a, b| a.code().cmp(b.code()));
        rates
    }

    /// Rates published for a past `date`. Display only; the cached rates
    /// used for conversion are untouched.
    #[instrument(skip(self))]
    pub async fn historical_rates(
        &self,
        date: NaiveDate,
    ) -> Result<HistoricalRates, ConversionError> {
        let unavailable =
            || ConversionError::DataUnavailable(format!("Failed to load exchange rates for {date}"));
        let snapshot = self
            .source
            .fetch_historical_rates(date)
            .await
            .ok_or_else(unavailable)?;
        let base = snapshot.base.clone();
        let mut rates: Vec<Rate> = rates_from_snapshot(snapshot, &self.currencies)
            .ok_or_else(unavailable)?
            .into_values()
            .collect();
        rates.sort_by(|a, b| a.code().cmp(b.code()));
        Ok(HistoricalRates { base, rates })
    }

    pub fn conversion_display(
        &self,
        from_code: &str,
        to_code: &str,
        amount: f64,
        result: f64,
    ) -> String {
        let from = Currency::new(from_code, self.currency_name(from_code));
        let to = Currency::new(to_code, self.currency_name(to_code));
        format_conversion(&from, amount, &to, result)
    }

    pub fn history(&self) -> &[Transaction] {
        self.history.get_all()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// `(from, to)` default currency codes.
    pub fn default_currencies(&self) -> (String, String) {
        (
            self.settings.get_str(DEFAULT_FROM_CURRENCY, "USD"),
            self.settings.get_str(DEFAULT_TO_CURRENCY, "EUR"),
        )
    }

    pub fn set_default_currencies(&mut self, from_code: &str, to_code: &str) {
        self.settings.set(DEFAULT_FROM_CURRENCY, from_code);
        self.settings.set(DEFAULT_TO_CURRENCY, to_code);
    }

    pub fn theme(&self) -> Theme {
        let raw = self.settings.get_str(THEME, "light");
        raw.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Unknown theme in settings, using default");
            Theme::default()
        })
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.set(THEME, theme.to_string());
    }

    pub fn settings(&self) -> BTreeMap<String, Value> {
        self.settings.get_all()
    }

    pub fn update_setting(&mut self, key: &str, value: impl Into<Value>) {
        self.settings.set(key, value);
    }
}

/// `amount / from_rate * to_rate`, guarding against rates that would make
/// the division meaningless.
fn convert_through_base(
    amount: f64,
    from_rate: f64,
    to_rate: f64,
) -> Result<(f64, f64), ConversionError> {
    if from_rate <= 0.0 || !from_rate.is_finite() {
        return Err(ConversionError::ConversionFault(format!(
            "invalid source rate {from_rate}"
        )));
    }

    let amount_in_base = amount / from_rate;
    let result = amount_in_base * to_rate;
    if !result.is_finite() {
        return Err(ConversionError::ConversionFault(
            "result is not a finite number".to_string(),
        ));
    }

    Ok((result, result / amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RatesSnapshot;
    use crate::store::testing::FakeRateSource;
    use std::collections::HashMap;
    use std::sync::atomic::Ordering;
    use tempfile::{TempDir, tempdir};

    const EPSILON: f64 = 1e-9;

    struct Fixture {
        _dir: TempDir,
        source: Arc<FakeRateSource>,
        service: ConversionService,
    }

    async fn initialized_service() -> Fixture {
        let dir = tempdir().unwrap();
        let source = Arc::new(FakeRateSource::with_usd_base());
        let mut service = ConversionService::new(
            source.clone(),
            HistoryStore::load(dir.path().join("history.json")),
            SettingsStore::load(dir.path().join("settings.json")),
        );
        service.initialize().await.expect("initialize failed");
        Fixture {
            _dir: dir,
            source,
            service,
        }
    }

    #[tokio::test]
    async fn test_convert_usd_to_idr() {
        let mut fx = initialized_service().await;
        let conversion = fx.service.convert("USD", "IDR", 10.0).unwrap();
        assert!((conversion.converted_amount - 150000.0).abs() < EPSILON);
        assert!((conversion.rate - 15000.0).abs() < EPSILON);
        assert_eq!(conversion.rate_info, "1 USD = 15000.0000 IDR");
    }

    #[tokio::test]
    async fn test_convert_eur_to_usd() {
        let mut fx = initialized_service().await;
        let conversion = fx.service.convert("EUR", "USD", 9.0).unwrap();
        assert!((conversion.converted_amount - 10.0).abs() < EPSILON);
    }

    #[tokio::test]
    async fn test_identity_conversion() {
        let mut fx = initialized_service().await;
        for amount in [0.01, 1.0, 9.0, 123456.789] {
            for code in ["USD", "EUR", "IDR"] {
                let conversion = fx.service.convert(code, code, amount).unwrap();
                assert!((conversion.converted_amount - amount).abs() <= amount * EPSILON);
            }
        }
    }

    #[tokio::test]
    async fn test_round_trip_returns_original_amount() {
        let mut fx = initialized_service().await;
        let pairs = [("USD", "IDR"), ("EUR", "IDR"), ("IDR", "EUR"), ("EUR", "USD")];
        for (from, to) in pairs {
            let there = fx.service.convert(from, to, 42.5).unwrap();
            let back = fx
                .service
                .convert(to, from, there.converted_amount)
                .unwrap();
            assert!(
                (back.converted_amount - 42.5).abs() < 1e-6,
                "{from}->{to} round trip gave {}",
                back.converted_amount
            );
        }
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_rejected_without_history() {
        let mut fx = initialized_service().await;
        for amount in [0.0, -5.0, f64::NAN] {
            let err = fx.service.convert("USD", "EUR", amount).unwrap_err();
            assert_eq!(
                err,
                ConversionError::Validation("Amount must be positive".to_string())
            );
        }
        assert!(fx.service.history().is_empty());
    }

    #[tokio::test]
    async fn test_empty_currency_is_rejected() {
        let mut fx = initialized_service().await;
        let err = fx.service.convert("", "EUR", 1.0).unwrap_err();
        assert!(matches!(err, ConversionError::Validation(_)));
        assert_eq!(err.to_string(), "Please select both currencies");
        assert!(fx.service.convert("USD", "", 1.0).is_err());
        assert!(fx.service.history().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_currency_reports_which_one() {
        let mut fx = initialized_service().await;
        let err = fx.service.convert("USD", "XYZ", 1.0).unwrap_err();
        assert_eq!(
            err,
            ConversionError::RateNotFound {
                code: "XYZ".to_string()
            }
        );
        let err = fx.service.convert("ABC", "XYZ", 1.0).unwrap_err();
        assert_eq!(err.to_string(), "Exchange rate not found for ABC");
        assert!(fx.service.history().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let mut fx = initialized_service().await;
        for amount in 1..=5 {
            fx.service.convert("USD", "EUR", amount as f64).unwrap();
        }
        let history = fx.service.history();
        assert_eq!(history.len(), 5);
        let amounts: Vec<f64> = history.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![5.0, 4.0, 3.0, 2.0, 1.0]);
        assert!(history.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert!((history[0].rate - history[0].result / history[0].amount).abs() < EPSILON);

        fx.service.clear_history();
        assert!(fx.service.history().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_fails_without_currencies() {
        let dir = tempdir().unwrap();
        let source = Arc::new(FakeRateSource::with_usd_base());
        source.set_currencies(None);
        let mut service = ConversionService::new(
            source.clone(),
            HistoryStore::load(dir.path().join("history.json")),
            SettingsStore::load(dir.path().join("settings.json")),
        );

        let err = service.initialize().await.unwrap_err();
        assert_eq!(
            err,
            ConversionError::DataUnavailable("Failed to load currency list".to_string())
        );
        assert!(err.is_recoverable());
        // Rates are not fetched when currencies fail
        assert_eq!(source.latest_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_rates() {
        let mut fx = initialized_service().await;
        fx.source.set_latest(None);
        let err = fx.service.refresh_rates().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load exchange rates");

        let conversion = fx.service.convert("USD", "IDR", 10.0).unwrap();
        assert!((conversion.converted_amount - 150000.0).abs() < EPSILON);
    }

    #[tokio::test]
    async fn test_currency_listing_and_display() {
        let fx = initialized_service().await;
        assert_eq!(
            fx.service.get_available_currencies(),
            vec![
                ("EUR".to_string(), "Euro".to_string()),
                ("IDR".to_string(), "Indonesian Rupiah".to_string()),
                ("USD".to_string(), "United States Dollar".to_string()),
            ]
        );
        assert_eq!(fx.service.currency_name("XYZ"), "XYZ");
        assert_eq!(
            fx.service.conversion_display("USD", "IDR", 10.0, 150000.0),
            "10.00 USD (United States Dollar)\n=\n150,000.00 IDR (Indonesian Rupiah)"
        );
        assert_eq!(fx.service.rate_info("EUR").unwrap().rate(), 0.9);
        assert_eq!(fx.service.base_currency(), Some("USD"));
        let codes: Vec<&str> = fx.service.all_rates().iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec!["EUR", "IDR", "USD"]);
    }

    #[tokio::test]
    async fn test_historical_rates_leave_cache_alone() {
        let mut fx = initialized_service().await;
        fx.source.set_latest(Some(RatesSnapshot {
            timestamp: Some(1_583_020_800),
            base: Some("EUR".to_string()),
            rates: Some(HashMap::from([
                ("EUR".to_string(), 1.0),
                ("JPY".to_string(), 120.0),
            ])),
        }));

        let date = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let historical = fx.service.historical_rates(date).await.unwrap();
        assert_eq!(historical.base.as_deref(), Some("EUR"));
        assert_eq!(fx.service.base_currency(), Some("USD"));
        let codes: Vec<&str> = historical.rates.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec!["EUR", "JPY"]);
        assert_eq!(historical.rates[0].name(), "Euro");
        assert_eq!(historical.rates[1].name(), "JPY");

        assert_eq!(fx.service.rate_info("EUR").unwrap().rate(), 0.9);
        assert!(fx.service.convert("USD", "JPY", 1.0).is_err());

        fx.source.set_latest(None);
        let err = fx.service.historical_rates(date).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load exchange rates for 2020-03-01");
    }

    #[tokio::test]
    async fn test_preferences() {
        let mut fx = initialized_service().await;
        assert_eq!(
            fx.service.default_currencies(),
            ("USD".to_string(), "EUR".to_string())
        );
        assert_eq!(fx.service.theme(), Theme::Light);

        fx.service.set_default_currencies("EUR", "IDR");
        fx.service.set_theme(Theme::Dark);
        assert_eq!(
            fx.service.default_currencies(),
            ("EUR".to_string(), "IDR".to_string())
        );
        assert_eq!(fx.service.theme(), Theme::Dark);

        fx.service.update_setting(THEME, "neon");
        assert_eq!(fx.service.theme(), Theme::Light);
        assert_eq!(fx.service.settings()[THEME], Value::from("neon"));
    }

    #[test]
    fn test_zero_rate_is_conversion_fault() {
        let err = convert_through_base(10.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, ConversionError::ConversionFault(_)));

        let err = convert_through_base(f64::MAX, 1e-300, 1e10).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Conversion error: result is not a finite number"
        );
    }
}
