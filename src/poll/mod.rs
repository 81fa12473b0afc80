//! Fixed-interval poll scheduler.
//!
//! The one concurrency primitive every data source builds on: run a
//! fallible callback once per tick until the cancellation token fires or
//! the callback reports its first error.

use crate::error::AppError;
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Drive `tick_fn` once per `period` until cancelled or failed.
///
/// Returns `AppError::Cancelled` when the token fires between ticks, or
/// the callback's first error verbatim: no retry, no further ticks. The
/// callback runs to completion before the next tick is considered; a tick
/// that fires while the callback is still running is skipped, never
/// queued, so at most one invocation is in flight. A callback that blocks
/// forever starves the loop; callbacks own their internal timeouts and
/// check cancellation before any blocking send.
pub async fn run<F, Fut>(cancel: &CancellationToken, period: Duration, mut tick_fn: F) -> AppError
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), AppError>>,
{
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return AppError::Cancelled,
            _ = ticker.tick() => {
                if let Err(err) = tick_fn().await {
                    return err;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn boom() -> AppError {
        HttpError::Decode("boom".into()).into()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_at_most_once_per_period() {
        let cancel = CancellationToken::new();
        let count = Arc::new(AtomicUsize::new(0));

        let task_cancel = cancel.clone();
        let task_count = count.clone();
        let handle = tokio::spawn(async move {
            run(&task_cancel, Duration::from_secs(1), move || {
                let count = task_count.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await
        });

        // Ticks land at 0s, 1s, 2s and 3s.
        tokio::time::sleep(Duration::from_millis(3500)).await;
        cancel.cancel();

        let err = handle.await.unwrap();
        assert!(matches!(err, AppError::Cancelled));
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_first_error_with_no_further_ticks() {
        let cancel = CancellationToken::new();
        let count = Arc::new(AtomicUsize::new(0));

        let tick_count = count.clone();
        let err = run(&cancel, Duration::from_secs(1), move || {
            let count = tick_count.clone();
            async move {
                if count.fetch_add(1, Ordering::SeqCst) == 2 {
                    Err(boom())
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(matches!(err, AppError::Http(HttpError::Decode(_))));
        // Failed on the third invocation; there is no fourth.
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_wins_over_a_ready_tick() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let count = Arc::new(AtomicUsize::new(0));
        let tick_count = count.clone();
        let err = run(&cancel, Duration::from_millis(10), move || {
            let count = tick_count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert!(matches!(err, AppError::Cancelled));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_callback_skips_missed_ticks() {
        let cancel = CancellationToken::new();
        let count = Arc::new(AtomicUsize::new(0));

        let task_cancel = cancel.clone();
        let task_count = count.clone();
        let handle = tokio::spawn(async move {
            run(&task_cancel, Duration::from_secs(1), move || {
                let count = task_count.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    // Overruns two tick boundaries; those ticks are lost.
                    tokio::time::sleep(Duration::from_millis(2500)).await;
                    Ok(())
                }
            })
            .await
        });

        tokio::time::sleep(Duration::from_millis(5600)).await;
        cancel.cancel();
        handle.await.unwrap();

        // 0s and ~3s (plus possibly ~5.5s), never one per second.
        let ticks = count.load(Ordering::SeqCst);
        assert!(ticks <= 3, "expected skipped ticks, got {ticks}");
        assert!(ticks >= 2);
    }
}
