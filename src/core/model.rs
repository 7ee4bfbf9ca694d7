//! Domain records shared by the stores and the conversion service

use anyhow::anyhow;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

/// A currency as listed by the upstream feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    code: String,
    name: String,
}

impl Currency {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.code, self.name)
    }
}

/// Value of one unit of the base currency expressed in `currency`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rate {
    currency: Currency,
    rate: f64,
    last_update: Option<DateTime<Utc>>,
}

impl Rate {
    pub fn new(currency: Currency, rate: f64, last_update: Option<DateTime<Utc>>) -> Self {
        Self {
            currency,
            rate,
            last_update,
        }
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn code(&self) -> &str {
        self.currency.code()
    }

    pub fn name(&self) -> &str {
        self.currency.name()
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }
}

/// A completed conversion, as kept in the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
    pub result: f64,
    /// Effective rate, always `result / amount`.
    pub rate: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<FixedOffset>,
}

/// Reads RFC 3339 timestamps, and ISO-8601 ones without an offset as local
/// time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts);
    }
    let naive = raw.parse::<NaiveDateTime>().map_err(D::Error::custom)?;
    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|ts| ts.fixed_offset())
        .ok_or_else(|| D::Error::custom(format!("Nonexistent local time: {raw}")))
}

/// Payload of the latest and historical rate endpoints.
///
/// `rates` stays optional so a payload without it can be told apart from
/// an empty feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RatesSnapshot {
    pub timestamp: Option<i64>,
    pub base: Option<String>,
    pub rates: Option<HashMap<String, f64>>,
}

impl RatesSnapshot {
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Theme::Light => "light",
                Theme::Dark => "dark",
            }
        )
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow!("Invalid theme: {}", s)),
        }
    }
}
