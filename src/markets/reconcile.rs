use serde::{Deserialize, Serialize};

use crate::config::TickerConfig;
use crate::fetch::TickerFetch;

/// Market states the provider reports while an instrument is tradeable.
const LIVE_STATES: &[&str] = &["REGULAR", "OPEN", "TRADING"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Live,
    Closed,
    Unavailable,
}

/// One persisted quote line in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub pretty: String,
    pub price: f64,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    pub status: QuoteStatus,
    pub updated_at: i64,
}

/// A reconciled quote plus whether its price came from the provider this
/// run (fallback prices never count toward the write quorum).
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledQuote {
    pub quote: Quote,
    pub fresh: bool,
}

/// Merge one ticker's fetch outcome with its fallback sources.
///
/// A fetched price is used exactly as reported. Without one, the quote
/// falls back to the previous snapshot's price for the symbol, then to the
/// static seed, and is marked unavailable. Change figures are only derived
/// when the provider also reported a non-zero previous close.
pub fn build_quote(
    cfg: &TickerConfig,
    fetch: &TickerFetch,
    previous_price: Option<f64>,
    now_ms: i64,
) -> ReconciledQuote {
    let (price, change, change_percent, status, fresh) = match fetch.price {
        Some(price) => {
            let (change, change_percent) = match fetch.previous_close {
                Some(previous_close) if previous_close != 0.0 => {
                    let change = price - previous_close;
                    (Some(change), Some(change / previous_close * 100.0))
                }
                _ => (None, None),
            };
            (price, change, change_percent, classify_state(fetch.market_state.as_deref()), true)
        }
        None => {
            let price = previous_price.unwrap_or(cfg.seed);
            (price, None, None, QuoteStatus::Unavailable, false)
        }
    };

    ReconciledQuote {
        quote: Quote {
            symbol: cfg.symbol.clone(),
            pretty: cfg.pretty.clone(),
            price,
            change,
            change_percent,
            status,
            updated_at: now_ms,
        },
        fresh,
    }
}

/// A missing state is treated as live; providers drop the field often
/// enough that the pessimistic reading would mark open markets closed.
fn classify_state(market_state: Option<&str>) -> QuoteStatus {
    match market_state {
        Some(state) if LIVE_STATES.contains(&state) => QuoteStatus::Live,
        Some(_) => QuoteStatus::Closed,
        None => QuoteStatus::Live,
    }
}

/// Outcome of the per-run aggregate decision over all tickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotDecision {
    /// Enough fresh prices; replace the persisted snapshot.
    Write,
    /// Too few fresh prices but a previous snapshot exists; keep it.
    KeepExisting,
    /// Too few fresh prices and nothing persisted yet; seed a file.
    WriteSeeded,
}

pub fn decide(fresh_count: usize, fresh_quorum: usize, has_existing: bool) -> SnapshotDecision {
    if fresh_count >= fresh_quorum {
        SnapshotDecision::Write
    } else if has_existing {
        SnapshotDecision::KeepExisting
    } else {
        SnapshotDecision::WriteSeeded
    }
}
