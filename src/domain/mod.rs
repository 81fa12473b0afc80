//! Domain slices for each polled data source.
//!
//! Each source runs on the poll scheduler, shares no mutable state with
//! its siblings or the view loop, and reports through the channels handed
//! to it at spawn. A source that fails stays down until the owning view
//! recreates it.

pub mod detail;
pub mod history;
pub mod snapshot;

use crate::error::AppError;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use detail::AssetDetail;

/// One result on the shared data channel.
#[derive(Debug, Clone)]
pub enum PollResult {
    /// Current price per tracked symbol (uppercase).
    Snapshot(HashMap<String, f64>),
    /// Baseline-zeroed price series plus the untransformed extremes, so
    /// `series[i] + min` reconstructs every original sample.
    History {
        series: Vec<f64>,
        min: f64,
        max: f64,
    },
    /// One asset's full record at a retrieval timestamp.
    Detail(AssetDetail),
}

/// Send `value` unless the view is torn down first.
///
/// The send races the cancellation token so a full channel never outlives
/// the view. A dropped receiver counts as teardown.
pub(crate) async fn send_or_cancelled<T>(
    cancel: &CancellationToken,
    tx: &mpsc::Sender<T>,
    value: T,
) -> Result<(), AppError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        sent = tx.send(value) => sent.map_err(|_| AppError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_or_cancelled_delivers_when_open() {
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel(1);

        send_or_cancelled(&cancel, &tx, 7u32).await.unwrap();
        assert_eq!(rx.recv().await, Some(7));
    }

    #[tokio::test]
    async fn send_or_cancelled_sends_nothing_after_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (tx, mut rx) = mpsc::channel(1);

        let err = send_or_cancelled(&cancel, &tx, 7u32).await.unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn send_or_cancelled_unblocks_when_cancelled_mid_send() {
        let cancel = CancellationToken::new();
        let (tx, _rx) = mpsc::channel(1);
        tx.send(0u32).await.unwrap(); // fill the only slot

        let send_cancel = cancel.clone();
        let handle =
            tokio::spawn(async move { send_or_cancelled(&send_cancel, &tx, 1).await });

        cancel.cancel();
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
    }

    #[tokio::test]
    async fn send_or_cancelled_treats_closed_channel_as_teardown() {
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::channel::<u32>(1);
        drop(rx);

        let err = send_or_cancelled(&cancel, &tx, 7).await.unwrap_err();
        assert!(matches!(err, AppError::Cancelled));
    }
}
