//! Price history for the inspected asset, baseline-zeroed for charting.

pub mod wire;

use crate::domain::{send_or_cancelled, PollResult};
use crate::error::{AppError, HttpError};
use crate::http::{MarketHttp, RetryPolicy};
use crate::poll;
use crate::shared::{AssetId, Interval};

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Cadence of the history poll.
pub const HISTORY_PERIOD: Duration = Duration::from_secs(3);

/// Poll the price series for one asset until cancelled or failed.
///
/// At the start of each cycle, at most one pending interval update is
/// drained from the watch channel; the channel holds only the newest
/// value, so an update published twice between ticks resolves to the later
/// one. The fetched series is shifted so its minimum sits at zero and the
/// untransformed extremes ride along for the consumer's labels.
pub async fn poll_price_history(
    cancel: CancellationToken,
    http: MarketHttp,
    id: AssetId,
    mut interval_rx: watch::Receiver<Interval>,
    data_tx: mpsc::Sender<PollResult>,
) -> AppError {
    let mut current = *interval_rx.borrow();

    let tick_cancel = cancel.clone();
    poll::run(&cancel, HISTORY_PERIOD, move || {
        drain_interval(&mut interval_rx, &mut current);
        let interval = current;
        let cancel = tick_cancel.clone();
        let http = http.clone();
        let id = id.clone();
        let data_tx = data_tx.clone();
        async move {
            let response = http.asset_history(&id, interval, RetryPolicy::None).await?;
            let series = parse_series(&response)?;
            let (series, min, max) = baseline_zero(series);

            send_or_cancelled(&cancel, &data_tx, PollResult::History { series, min, max }).await
        }
    })
    .await
}

/// Drain at most one pending interval update, newest winning.
///
/// Never blocks; with nothing pending the current interval stands. A
/// dropped sender also leaves the current interval in place.
fn drain_interval(rx: &mut watch::Receiver<Interval>, current: &mut Interval) {
    if rx.has_changed().unwrap_or(false) {
        *current = *rx.borrow_and_update();
    }
}

/// Parse the provider's string prices, preserving order.
fn parse_series(response: &wire::AssetHistory) -> Result<Vec<f64>, AppError> {
    response
        .data
        .iter()
        .map(|point| {
            point.price_usd.parse::<f64>().map_err(|err| {
                HttpError::Decode(format!("price {:?}: {err}", point.price_usd)).into()
            })
        })
        .collect()
}

/// Shift a series so its minimum sits at zero.
///
/// Returns the shifted series plus the original minimum and maximum;
/// `shifted[i] + min` reconstructs every sample. An empty series maps to
/// `(vec![], 0.0, 0.0)`.
fn baseline_zero(mut series: Vec<f64>) -> (Vec<f64>, f64, f64) {
    if series.is_empty() {
        return (series, 0.0, 0.0);
    }

    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    for value in &mut series {
        *value -= min;
    }
    (series, min, max)
}
