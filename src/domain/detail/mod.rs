//! Full asset record for the inspected asset.

pub mod wire;

use crate::domain::{send_or_cancelled, PollResult};
use crate::error::AppError;
use crate::http::{MarketHttp, RetryPolicy};
use crate::poll;
use crate::shared::AssetId;

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Cadence of the detail poll.
pub const DETAIL_PERIOD: Duration = Duration::from_secs(3);

/// One asset record and when the provider served it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDetail {
    pub asset: wire::Asset,
    pub retrieved_at: DateTime<Utc>,
}

impl From<wire::AssetEnvelope> for AssetDetail {
    fn from(envelope: wire::AssetEnvelope) -> Self {
        let retrieved_at = DateTime::from_timestamp_millis(envelope.timestamp as i64)
            .unwrap_or_else(Utc::now);
        Self {
            asset: envelope.data,
            retrieved_at,
        }
    }
}

/// Poll the record for one asset until cancelled or failed.
///
/// The record passes through untransformed; all numeric parsing happens at
/// the display layer. The identifier never changes for the poller's
/// lifetime, so the request URL is built once, outside the loop.
pub async fn poll_asset_detail(
    cancel: CancellationToken,
    http: MarketHttp,
    id: AssetId,
    data_tx: mpsc::Sender<PollResult>,
) -> AppError {
    let url = http.asset_detail_url(&id);

    let tick_cancel = cancel.clone();
    poll::run(&cancel, DETAIL_PERIOD, move || {
        let cancel = tick_cancel.clone();
        let http = http.clone();
        let url = url.clone();
        let data_tx = data_tx.clone();
        async move {
            let envelope = http.asset_detail_at(&url, RetryPolicy::None).await?;

            send_or_cancelled(&cancel, &data_tx, PollResult::Detail(envelope.into())).await
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_timestamp_becomes_retrieval_time() {
        let envelope = wire::AssetEnvelope {
            data: wire::Asset::default(),
            timestamp: 1_690_000_000_000,
        };
        let detail = AssetDetail::from(envelope);
        assert_eq!(detail.retrieved_at.timestamp_millis(), 1_690_000_000_000);
    }

    #[tokio::test(start_paused = true)]
    async fn no_sends_after_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let (data_tx, mut data_rx) = mpsc::channel(4);
        let err = poll_asset_detail(
            cancel,
            MarketHttp::new(),
            AssetId::from("bitcoin"),
            data_tx,
        )
        .await;

        assert!(matches!(err, AppError::Cancelled));
        assert!(data_rx.try_recv().is_err());
    }
}
