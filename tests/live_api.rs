//! Smoke tests against the real providers.
//!
//! All `#[ignore]` because they need network access.
//!
//! Run with:
//! ```bash
//! cargo test --test live_api -- --ignored
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use coinwatch::http::{MarketHttp, MarketOrder, MarketsQuery, RetryPolicy};
use coinwatch::shared::{AssetId, Interval};
use coinwatch::ws::stream_live_price;

const TEST_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::test]
#[ignore]
async fn fetches_bitcoin_detail() {
    let http = MarketHttp::new();
    let envelope = http
        .asset_detail(&AssetId::from("bitcoin"), RetryPolicy::Idempotent)
        .await
        .expect("detail request should succeed");

    assert_eq!(envelope.data.symbol, "BTC");
    assert!(envelope.data.price_usd.parse::<f64>().is_ok());
}

#[tokio::test]
#[ignore]
async fn fetches_bitcoin_history() {
    let http = MarketHttp::new();
    let history = http
        .asset_history(&AssetId::from("bitcoin"), Interval::Day1, RetryPolicy::Idempotent)
        .await
        .expect("history request should succeed");

    assert!(!history.data.is_empty());
    assert!(history.data[0].price_usd.parse::<f64>().is_ok());
}

#[tokio::test]
#[ignore]
async fn fetches_batched_markets() {
    let http = MarketHttp::new();
    let query = MarketsQuery {
        currency: "usd".into(),
        order: MarketOrder::MarketCapDesc,
        ids: vec![AssetId::from("bitcoin"), AssetId::from("ethereum")],
        per_page: 2,
        page: 1,
        sparkline: false,
    };
    let rows = http
        .markets(&query, RetryPolicy::Idempotent)
        .await
        .expect("markets request should succeed");

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|row| row.symbol.eq_ignore_ascii_case("btc")));
}

#[tokio::test]
#[ignore]
async fn streams_a_live_price() {
    let cancel = CancellationToken::new();
    let (price_tx, mut price_rx) = mpsc::channel(8);

    let stream_cancel = cancel.clone();
    let handle = tokio::spawn(stream_live_price(
        stream_cancel,
        AssetId::from("bitcoin"),
        price_tx,
    ));

    let price = timeout(TEST_TIMEOUT, price_rx.recv())
        .await
        .expect("timed out waiting for a live price")
        .expect("stream ended before a price arrived");
    assert!(price.parse::<f64>().is_ok());

    cancel.cancel();
    handle.await.unwrap();
}
