//! coinwatch binary: wire the pollers to the terminal view.

use clap::Parser;
use coinwatch::domain::detail::poll_asset_detail;
use coinwatch::domain::history::poll_price_history;
use coinwatch::domain::snapshot::poll_tracked_prices;
use coinwatch::error::AppError;
use coinwatch::http::MarketHttp;
use coinwatch::shared::{AssetId, Interval};
use coinwatch::tui::{TerminalGuard, TuiRenderer};
use coinwatch::view::input::{self, UiEvent};
use coinwatch::view::{run_view, ViewChannels};
use coinwatch::ws::stream_live_price;

use crossterm::event::EventStream;
use futures_util::StreamExt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "coinwatch", version, about = "Terminal tracker for crypto assets")]
struct Cli {
    /// Asset to inspect.
    #[arg(long, default_value = "bitcoin")]
    asset: String,

    /// Quote currency for the batched snapshot.
    #[arg(long, default_value = "usd")]
    currency: String,

    /// Tracked assets shown in the favourites table.
    #[arg(long = "track", value_delimiter = ',', default_value = "bitcoin,ethereum,dogecoin")]
    tracked: Vec<String>,

    /// Log file. Logging is enabled only when RUST_LOG is set; writing to
    /// stderr would corrupt the alternate screen.
    #[arg(long, default_value = "coinwatch.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_file);

    let err = run(cli).await;
    if err.is_shutdown() {
        ExitCode::SUCCESS
    } else {
        eprintln!("coinwatch: {err}");
        ExitCode::FAILURE
    }
}

async fn run(cli: Cli) -> AppError {
    let guard = match TerminalGuard::enter() {
        Ok(guard) => guard,
        Err(err) => return err,
    };
    let mut renderer = match TuiRenderer::new() {
        Ok(renderer) => renderer,
        Err(err) => return err,
    };

    let cancel = CancellationToken::new();
    let http = MarketHttp::new();
    let id = AssetId::from(cli.asset.as_str());

    let (data_tx, data_rx) = mpsc::channel(16);
    let (price_tx, price_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(64);
    let (interval_tx, interval_rx) = watch::channel(Interval::default());

    let tracked: Vec<AssetId> = cli.tracked.iter().map(|id| AssetId::from(id.as_str())).collect();
    let (tracked_tx, tracked_rx) = watch::channel(tracked);
    // The tracked set is owned here; it outlives every poller cycle and
    // could be republished between cycles.
    let _tracked_tx = tracked_tx;

    spawn_poller(
        "snapshot",
        poll_tracked_prices(
            cancel.child_token(),
            http.clone(),
            cli.currency.clone(),
            tracked_rx,
            data_tx.clone(),
        ),
    );
    spawn_poller(
        "history",
        poll_price_history(
            cancel.child_token(),
            http.clone(),
            id.clone(),
            interval_rx,
            data_tx.clone(),
        ),
    );
    spawn_poller(
        "detail",
        poll_asset_detail(cancel.child_token(), http.clone(), id.clone(), data_tx),
    );
    spawn_poller(
        "live-price",
        stream_live_price(cancel.child_token(), id, price_tx),
    );

    tokio::spawn(forward_input(cancel.child_token(), ui_tx));

    let channels = ViewChannels {
        ui_rx,
        data_rx,
        price_rx,
        interval_tx,
    };
    let err = run_view(cancel.child_token(), channels, &mut renderer).await;

    // Tear down every poller, then restore the screen before reporting.
    cancel.cancel();
    drop(guard);
    err
}

/// Spawn a poller; its single terminal condition goes to the log.
fn spawn_poller(name: &'static str, poller: impl Future<Output = AppError> + Send + 'static) {
    tokio::spawn(async move {
        let err = poller.await;
        if err.is_shutdown() {
            tracing::debug!(poller = name, "stopped: {err}");
        } else {
            tracing::error!(poller = name, "failed: {err}");
        }
    });
}

/// Forward terminal events to the view until cancelled.
async fn forward_input(cancel: CancellationToken, ui_tx: mpsc::Sender<UiEvent>) {
    let mut events = EventStream::new();
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            maybe = events.next() => match maybe {
                Some(Ok(event)) => {
                    if let Some(event) = input::map_event(event) {
                        if ui_tx.send(event).await.is_err() {
                            return;
                        }
                    }
                }
                Some(Err(err)) => {
                    tracing::warn!("input source error: {err}");
                    return;
                }
                None => return,
            },
        }
    }
}

fn init_tracing(path: &Path) {
    let Ok(filter) = EnvFilter::try_from_default_env() else {
        return;
    };
    let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
}
