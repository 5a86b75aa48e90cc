use log::{info, warn};

pub mod reconcile;
pub mod snapshot;

pub use reconcile::{build_quote, decide, Quote, QuoteStatus, ReconciledQuote, SnapshotDecision};
pub use snapshot::{read_existing, write_snapshot, Snapshot};

use crate::config::MarketsConfig;
use crate::error::Result;
use crate::fetch::{QuoteSource, TickerFetch};
use crate::utils::now_millis;

/// One markets run: fetch every configured ticker sequentially, reconcile
/// against the persisted snapshot, then apply the aggregate write decision.
pub async fn run(config: &MarketsConfig, source: &impl QuoteSource) -> Result<()> {
    let now_ms = now_millis();
    let existing = snapshot::read_existing(&config.snapshot_path);

    let mut quotes = Vec::with_capacity(config.tickers.len());
    let mut fresh_count = 0;

    for ticker in &config.tickers {
        let fetch = match source.fetch_quote(&ticker.symbol).await {
            Ok(fetch) => fetch,
            Err(err) => {
                warn!("fetch failed for {}: {err}", ticker.symbol);
                TickerFetch::default()
            }
        };

        let previous_price = existing
            .as_ref()
            .and_then(|snapshot| snapshot.previous_price(&ticker.symbol));
        let reconciled = build_quote(ticker, &fetch, previous_price, now_ms);

        if reconciled.fresh {
            fresh_count += 1;
        }
        quotes.push(reconciled.quote);
    }

    match decide(fresh_count, config.fresh_quorum, existing.is_some()) {
        SnapshotDecision::Write => {
            let candidate = Snapshot {
                updated_at: now_ms,
                quotes,
            };
            snapshot::write_snapshot(&config.snapshot_path, &candidate)?;
            info!(
                "updated {} with {fresh_count} fresh prices",
                config.snapshot_path.display()
            );
        }
        SnapshotDecision::KeepExisting => {
            warn!("only {fresh_count} fresh prices; keeping existing snapshot unchanged");
        }
        SnapshotDecision::WriteSeeded => {
            warn!("no existing snapshot; writing seed payload");
            let seeded = Snapshot::seeded(&config.tickers, now_ms);
            snapshot::write_snapshot(&config.snapshot_path, &seeded)?;
        }
    }

    Ok(())
}
