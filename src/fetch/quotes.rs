use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};

const QUOTE_ENDPOINT: &str = "https://query1.finance.yahoo.com/v7/finance/quote";

// Yahoo rejects requests without a browser user agent.
const USER_AGENT: &str = "Mozilla/5.0";

const PRICE_KEYS: &[&str] = &["regularMarketPrice", "postMarketPrice"];
const PREVIOUS_CLOSE_KEYS: &[&str] = &["regularMarketPreviousClose", "previousClose"];

/// Best-effort fields for one symbol. Any field the provider omitted,
/// mistyped, or reported as a non-finite number is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerFetch {
    pub price: Option<f64>,
    pub previous_close: Option<f64>,
    pub market_state: Option<String>,
}

/// Capability interface for the external quote provider. Callers treat an
/// `Err` as "no fresh data for this symbol"; it must never abort a run.
#[allow(async_fn_in_trait)]
pub trait QuoteSource {
    async fn fetch_quote(&self, symbol: &str) -> Result<TickerFetch>;
}

/// Quote source backed by the Yahoo Finance v7 quote endpoint.
pub struct YahooQuoteSource {
    client: Client,
}

impl YahooQuoteSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for YahooQuoteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteSource for YahooQuoteSource {
    async fn fetch_quote(&self, symbol: &str) -> Result<TickerFetch> {
        let response = self
            .client
            .get(QUOTE_ENDPOINT)
            .query(&[("symbols", symbol)])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::message(format!(
                "quote request for {} failed with status {}",
                symbol,
                response.status()
            )));
        }

        let body = response.text().await?;
        Ok(parse_quote_payload(&body))
    }
}

/// Pull the interesting fields out of a v7 quote response. Extraction is
/// lenient end to end: a payload of any shape yields a `TickerFetch`, with
/// unusable fields left unset.
pub fn parse_quote_payload(body: &str) -> TickerFetch {
    let json: Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) => return TickerFetch::default(),
    };

    let row = &json["quoteResponse"]["result"][0];

    TickerFetch {
        price: first_number(row, PRICE_KEYS),
        previous_close: first_number(row, PREVIOUS_CLOSE_KEYS),
        market_state: extract_state(row),
    }
}

/// First key in `keys` that holds a usable number.
fn first_number(row: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| row.get(*key).and_then(coerce_number))
}

/// Accept numbers and numeric strings; reject everything else, including
/// NaN and infinities.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    number.is_finite().then_some(number)
}

fn extract_state(row: &Value) -> Option<String> {
    row.get("marketState")
        .and_then(|state| state.as_str())
        .map(str::trim)
        .filter(|state| !state.is_empty())
        .map(str::to_uppercase)
}
