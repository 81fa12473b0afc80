//! Live price stream over the provider websocket.
//!
//! One connection per inspected asset, opened before the scheduling loop
//! starts. Each tick performs a single read; inbound text frames decode as
//! an identifier → price-string map and the matching entry is forwarded
//! raw on the dedicated price channel. Prices bypass the data channel
//! because they arrive an order of magnitude more often than poll results
//! and need none of the heavier processing.
//!
//! Faults are fatal. The connection is dropped (and thereby closed) on
//! every exit path; the owning view restarts the stream by respawning the
//! task.

use crate::domain::send_or_cancelled;
use crate::error::{AppError, WsError};
use crate::network;
use crate::poll;
use crate::shared::AssetId;

use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

/// Retry cadence for a stalled read on a healthy connection.
pub const LIVE_READ_PERIOD: Duration = Duration::from_millis(100);

/// Stream live prices for one asset until cancelled or faulted.
///
/// Forwards the raw price string for `id`; frames carrying other assets
/// are skipped. A read fault, an undecodable text frame, or the peer
/// closing the stream all terminate the task with one error.
pub async fn stream_live_price(
    cancel: CancellationToken,
    id: AssetId,
    price_tx: mpsc::Sender<String>,
) -> AppError {
    stream_live_price_from(cancel, network::LIVE_PRICE_WS_URL, id, price_tx).await
}

/// [`stream_live_price`] against an explicit endpoint.
pub async fn stream_live_price_from(
    cancel: CancellationToken,
    endpoint: &str,
    id: AssetId,
    price_tx: mpsc::Sender<String>,
) -> AppError {
    let url = format!("{}?assets={}", endpoint, id);
    let (stream, _) = match connect_async(url.as_str()).await {
        Ok(parts) => parts,
        Err(err) => return WsError::ConnectionFailed(err.to_string()).into(),
    };

    // The scheduler callback needs the stream across ticks; the lock is
    // uncontended since only this task ever holds it.
    let frames = Arc::new(Mutex::new(stream));

    let tick_cancel = cancel.clone();
    let err = poll::run(&cancel, LIVE_READ_PERIOD, move || {
        let cancel = tick_cancel.clone();
        let id = id.clone();
        let price_tx = price_tx.clone();
        let frames = frames.clone();
        async move {
            let mut frames = frames.lock().await;
            match frames.next().await {
                Some(Ok(Message::Text(text))) => {
                    let prices: HashMap<String, String> = serde_json::from_str(text.as_ref())
                        .map_err(|err| WsError::DeserializationError(err.to_string()))?;

                    match prices.get(id.as_str()) {
                        Some(price) => {
                            send_or_cancelled(&cancel, &price_tx, price.clone()).await
                        }
                        None => Ok(()),
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    Err(WsError::Closed("price stream closed by peer".into()).into())
                }
                // Ping/pong/binary frames carry no prices.
                Some(Ok(_)) => Ok(()),
                Some(Err(err)) => Err(WsError::Read(err.to_string()).into()),
                None => Err(WsError::Closed("price stream ended".into()).into()),
            }
        }
    })
    .await;

    // `frames` drops here, closing the socket regardless of exit path.
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::SinkExt;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    #[test]
    fn test_price_frame_decodes_as_string_map() {
        let frame = r#"{"bitcoin":"29403.12","ethereum":"1843.55"}"#;
        let prices: HashMap<String, String> = serde_json::from_str(frame).unwrap();
        assert_eq!(prices.get("bitcoin").map(String::as_str), Some("29403.12"));
        assert_eq!(prices.len(), 2);
    }

    #[tokio::test]
    async fn connection_failure_is_fatal_and_sends_nothing() {
        let cancel = CancellationToken::new();
        let (price_tx, mut price_rx) = mpsc::channel(4);

        // Discard port: nothing listens there.
        let err = stream_live_price_from(
            cancel,
            "ws://127.0.0.1:9",
            AssetId::from("bitcoin"),
            price_tx,
        )
        .await;

        assert!(matches!(err, AppError::Ws(WsError::ConnectionFailed(_))));
        assert!(price_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn forwards_matching_prices_and_fails_on_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(socket).await.unwrap();
            ws.send(Message::Text(
                r#"{"bitcoin":"29403.12","ethereum":"1843.55"}"#.into(),
            ))
            .await
            .unwrap();
            ws.send(Message::Text(r#"{"ethereum":"1843.60"}"#.into()))
                .await
                .unwrap();
            ws.send(Message::Text(r#"{"bitcoin":"29404.00"}"#.into()))
                .await
                .unwrap();
            ws.close(None).await.unwrap();
        });

        let cancel = CancellationToken::new();
        let (price_tx, mut price_rx) = mpsc::channel(8);
        let err = stream_live_price_from(
            cancel,
            &format!("ws://{addr}/"),
            AssetId::from("bitcoin"),
            price_tx,
        )
        .await;

        // Only the frames naming our asset come through, in order.
        assert_eq!(price_rx.recv().await.as_deref(), Some("29403.12"));
        assert_eq!(price_rx.recv().await.as_deref(), Some("29404.00"));
        assert!(price_rx.recv().await.is_none());
        assert!(matches!(err, AppError::Ws(WsError::Closed(_))));

        server.await.unwrap();
    }
}
