use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::TickerConfig;
use crate::error::{Context, Result};
use crate::markets::reconcile::{Quote, QuoteStatus};

/// The persisted unit: one timestamp plus one quote per configured ticker,
/// in ticker declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub updated_at: i64,
    pub quotes: Vec<Quote>,
}

impl Snapshot {
    /// Snapshot with every ticker at its seed price, written on a first run
    /// that could not reach quorum so consumers always find a file.
    pub fn seeded(tickers: &[TickerConfig], now_ms: i64) -> Self {
        let quotes = tickers
            .iter()
            .map(|cfg| Quote {
                symbol: cfg.symbol.clone(),
                pretty: cfg.pretty.clone(),
                price: cfg.seed,
                change: None,
                change_percent: None,
                status: QuoteStatus::Unavailable,
                updated_at: now_ms,
            })
            .collect();

        Self {
            updated_at: now_ms,
            quotes,
        }
    }

    /// Usable fallback price for a symbol from this snapshot, if any.
    pub fn previous_price(&self, symbol: &str) -> Option<f64> {
        self.quotes
            .iter()
            .find(|quote| quote.symbol == symbol)
            .map(|quote| quote.price)
            .filter(|price| price.is_finite())
    }
}

/// Load the persisted snapshot. A missing, unreadable, or malformed file
/// all mean "no existing snapshot"; none of them is fatal.
pub fn read_existing(path: &Path) -> Option<Snapshot> {
    if !path.exists() {
        return None;
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!("could not read snapshot at {}: {err}", path.display());
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            warn!("ignoring malformed snapshot at {}: {err}", path.display());
            None
        }
    }
}

/// Replace the snapshot file in one step: serialize to a sibling temp file,
/// then rename it over the target.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create snapshot directory {:?}", parent))?;
        }
    }

    let json = serde_json::to_string_pretty(snapshot).context("failed to serialize snapshot")?;

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = Path::new(&tmp_path);

    fs::write(tmp_path, json)
        .with_context(|| format!("failed to write snapshot temp file {:?}", tmp_path))?;
    fs::rename(tmp_path, path)
        .with_context(|| format!("failed to move snapshot into place at {:?}", path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::path::PathBuf;
    use std::process;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::MarketsConfig;

    static WORKSPACE_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_workspace(label: &str) -> PathBuf {
        let seq = WORKSPACE_SEQ.fetch_add(1, Ordering::SeqCst);
        let dir = env::temp_dir().join(format!(
            "sentiment-board-{label}-{}-{seq}",
            process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp workspace");
        dir
    }

    #[test]
    fn seeded_snapshot_keeps_ticker_order() {
        let config = MarketsConfig::builtin();
        let snapshot = Snapshot::seeded(&config.tickers, 7);

        assert_eq!(snapshot.quotes.len(), config.tickers.len());
        for (quote, cfg) in snapshot.quotes.iter().zip(&config.tickers) {
            assert_eq!(quote.symbol, cfg.symbol);
            assert_eq!(quote.price, cfg.seed);
            assert_eq!(quote.status, QuoteStatus::Unavailable);
            assert_eq!(quote.updated_at, 7);
        }
    }

    #[test]
    fn read_existing_returns_none_for_missing_file() {
        let dir = temp_workspace("missing");
        assert_eq!(read_existing(&dir.join("markets.json")), None);
    }

    #[test]
    fn read_existing_returns_none_for_malformed_json() {
        let dir = temp_workspace("malformed");
        let path = dir.join("markets.json");
        fs::write(&path, "{\"updatedAt\": 12, \"quotes\": [oops").expect("write fixture");

        assert_eq!(read_existing(&path), None);
    }

    #[test]
    fn write_snapshot_replaces_file_and_cleans_temp() {
        let dir = temp_workspace("write");
        let path = dir.join("nested").join("markets.json");
        let config = MarketsConfig::builtin();

        write_snapshot(&path, &Snapshot::seeded(&config.tickers, 1)).expect("first write");
        write_snapshot(&path, &Snapshot::seeded(&config.tickers, 2)).expect("second write");

        let reread = read_existing(&path).expect("snapshot reads back");
        assert_eq!(reread.updated_at, 2);
        assert!(
            !path.parent().unwrap().join("markets.json.tmp").exists(),
            "temp file should not survive a successful write"
        );
    }

    #[test]
    fn snapshot_serializes_wire_field_names() {
        let config = MarketsConfig::builtin();
        let value = serde_json::to_value(Snapshot::seeded(&config.tickers, 9))
            .expect("snapshot serializes");

        assert!(value.get("updatedAt").is_some());
        let first = &value["quotes"][0];
        assert_eq!(first["symbol"], "^NSEI");
        assert_eq!(first["pretty"], "NSE Nifty");
        assert_eq!(first["status"], "unavailable");
        assert!(first["change"].is_null());
        assert!(first["changePercent"].is_null());
    }

    #[test]
    fn previous_price_ignores_unknown_symbols() {
        let config = MarketsConfig::builtin();
        let snapshot = Snapshot::seeded(&config.tickers, 0);

        assert_eq!(snapshot.previous_price("GC=F"), Some(2000.0));
        assert_eq!(snapshot.previous_price("AAPL"), None);
    }
}
