//! Batched price snapshot for the tracked asset set.

pub mod wire;

use crate::domain::{send_or_cancelled, PollResult};
use crate::error::AppError;
use crate::http::{MarketHttp, MarketOrder, MarketsQuery, RetryPolicy};
use crate::poll;
use crate::shared::AssetId;

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use self::wire::MarketRow;

/// Cadence of the batched snapshot poll. Coarser than the per-asset polls
/// so the markets provider's rate limit covers the whole tracked set.
pub const SNAPSHOT_PERIOD: Duration = Duration::from_secs(10);

/// Poll current prices for every tracked asset until cancelled or failed.
///
/// The tracked set is materialized once per cycle; a list published on the
/// watch channel mid-cycle takes effect on the next one. Results land on
/// the shared data channel as [`PollResult::Snapshot`].
pub async fn poll_tracked_prices(
    cancel: CancellationToken,
    http: MarketHttp,
    currency: String,
    tracked: watch::Receiver<Vec<AssetId>>,
    data_tx: mpsc::Sender<PollResult>,
) -> AppError {
    let tick_cancel = cancel.clone();
    poll::run(&cancel, SNAPSHOT_PERIOD, move || {
        let ids: Vec<AssetId> = tracked.borrow().clone();
        let cancel = tick_cancel.clone();
        let http = http.clone();
        let currency = currency.clone();
        let data_tx = data_tx.clone();
        async move {
            // The provider rejects an empty id list; an empty tracked set
            // still produces an (empty) snapshot.
            if ids.is_empty() {
                return send_or_cancelled(&cancel, &data_tx, PollResult::Snapshot(HashMap::new()))
                    .await;
            }

            let query = MarketsQuery {
                currency,
                order: MarketOrder::MarketCapDesc,
                per_page: ids.len(),
                page: 1,
                sparkline: false,
                ids,
            };
            let rows = http.markets(&query, RetryPolicy::None).await?;
            let prices = fold_prices(rows);

            send_or_cancelled(&cancel, &data_tx, PollResult::Snapshot(prices)).await
        }
    })
    .await
}

/// Fold response rows into a symbol → price map.
///
/// Symbols are uppercased; a symbol appearing twice in one batch keeps the
/// last value seen. Rows without a price are dropped.
fn fold_prices(rows: Vec<MarketRow>) -> HashMap<String, f64> {
    let mut prices = HashMap::with_capacity(rows.len());
    for row in rows {
        if let Some(price) = row.current_price {
            prices.insert(row.symbol.to_uppercase(), price);
        }
    }
    prices
}
