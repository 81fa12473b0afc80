//! The event multiplexer: one loop owning the display state.
//!
//! Each iteration waits on exactly one of { cancellation, refresh timer,
//! user input, data channel, price channel }, applies the matching state
//! transition, and renders once. The loop performs no blocking I/O — all
//! fetching happens in the pollers — so input handling stays responsive.

pub mod currency;
pub mod input;
pub mod state;

use crate::domain::PollResult;
use crate::error::AppError;
use crate::shared::Interval;
use crate::view::currency::CurrencyOverlay;
use crate::view::input::{Key, UiEvent};
use crate::view::state::{DisplayState, SortColumn};

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Cadence of the layout refresh.
pub const REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// Rows moved by Ctrl-d / Ctrl-u and Ctrl-f / Ctrl-b.
const HALF_PAGE: usize = 5;
const FULL_PAGE: usize = 10;

/// Drawing surface for the view loop.
///
/// Called exactly once per handled event. Implementations pick the primary
/// layout or the overlay from `state.overlay_active`.
pub trait Renderer {
    fn render(&mut self, state: &DisplayState) -> Result<(), AppError>;
}

/// Channels wired into the view loop at spawn.
pub struct ViewChannels {
    pub ui_rx: mpsc::Receiver<UiEvent>,
    pub data_rx: mpsc::Receiver<PollResult>,
    pub price_rx: mpsc::Receiver<String>,
    /// Single-slot selector read by the history poller; only the newest
    /// published interval survives until the poller's next cycle.
    pub interval_tx: watch::Sender<Interval>,
}

enum Outcome {
    Continue,
    Quit,
}

/// Run the view loop until cancellation or user quit.
///
/// Returns `AppError::Cancelled` or `AppError::Closed` (or a renderer
/// error); the loop never restarts itself. A poller dying merely stops its
/// portion of the display from updating.
pub async fn run_view<R: Renderer>(
    cancel: CancellationToken,
    channels: ViewChannels,
    renderer: &mut R,
) -> AppError {
    let ViewChannels {
        mut ui_rx,
        mut data_rx,
        mut price_rx,
        interval_tx,
    } = channels;

    let mut state = DisplayState::new();
    let mut previous_key: Option<Key> = None;

    let mut refresh = time::interval(REFRESH_PERIOD);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // A closed channel must stop being polled or it would spin the loop.
    let mut data_open = true;
    let mut price_open = true;

    if let Err(err) = renderer.render(&state) {
        return err;
    }

    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return AppError::Cancelled,

            event = ui_rx.recv() => match event {
                Some(event) => {
                    handle_input(&mut state, &interval_tx, &mut previous_key, event)
                }
                // The input source is gone; only cancellation can end the
                // loop now, so treat it as teardown.
                None => return AppError::Cancelled,
            },

            result = data_rx.recv(), if data_open => {
                match result {
                    Some(result) => apply_result(&mut state, result),
                    None => data_open = false,
                }
                Outcome::Continue
            }

            price = price_rx.recv(), if price_open => {
                match price {
                    Some(raw) => state.apply_live_price(&raw),
                    None => price_open = false,
                }
                Outcome::Continue
            }

            _ = refresh.tick() => Outcome::Continue,
        };

        if let Outcome::Quit = outcome {
            return AppError::Closed;
        }
        if let Err(err) = renderer.render(&state) {
            return err;
        }
    }
}

fn apply_result(state: &mut DisplayState, result: PollResult) {
    match result {
        PollResult::Snapshot(prices) => state.apply_snapshot(prices),
        PollResult::History { series, min, max } => state.apply_history(series, min, max),
        PollResult::Detail(detail) => state.apply_detail(&detail),
    }
}

fn handle_input(
    state: &mut DisplayState,
    interval_tx: &watch::Sender<Interval>,
    previous_key: &mut Option<Key>,
    event: UiEvent,
) -> Outcome {
    let UiEvent::Key(key) = event else {
        // Resize: the render after this event picks up the new size.
        return Outcome::Continue;
    };

    // Quit keys work everywhere; Esc quits only outside the overlay.
    match key {
        Key::Char('q') | Key::CtrlC => return Outcome::Quit,
        Key::Esc if !state.overlay_active => return Outcome::Quit,
        _ => {}
    }

    if state.overlay_active {
        handle_overlay_key(state, key);
    } else {
        handle_view_key(state, interval_tx, previous_key, key);
    }
    Outcome::Continue
}

fn handle_view_key(
    state: &mut DisplayState,
    interval_tx: &watch::Sender<Interval>,
    previous_key: &mut Option<Key>,
    key: Key,
) {
    match key {
        Key::Char('c') => {
            state.overlay = CurrencyOverlay::compact();
            state.overlay_active = true;
        }
        Key::Char('C') => {
            state.overlay = CurrencyOverlay::all();
            state.overlay_active = true;
        }

        Key::Char('i') => {
            state.interval = state.interval.cycle_up();
            interval_tx.send_replace(state.interval);
        }
        Key::Char('I') => {
            state.interval = state.interval.cycle_down();
            interval_tx.send_replace(state.interval);
        }

        Key::Char('j') | Key::Down => state.cursor_down(1),
        Key::Char('k') | Key::Up => state.cursor_up(1),
        Key::HalfPageDown => state.cursor_down(HALF_PAGE),
        Key::HalfPageUp => state.cursor_up(HALF_PAGE),
        Key::PageDown => state.cursor_down(FULL_PAGE),
        Key::PageUp => state.cursor_up(FULL_PAGE),
        Key::Char('g') => {
            if *previous_key == Some(Key::Char('g')) {
                state.cursor_top();
                *previous_key = None;
                return;
            }
        }
        Key::Home => state.cursor_top(),
        Key::Char('G') | Key::End => state.cursor_bottom(),

        Key::Char('1') => state.set_sort(SortColumn::Symbol, true),
        Key::Char('2') => state.set_sort(SortColumn::Price, true),
        Key::F(1) => state.set_sort(SortColumn::Symbol, false),
        Key::F(2) => state.set_sort(SortColumn::Price, false),

        _ => {}
    }
    *previous_key = Some(key);
}

fn handle_overlay_key(state: &mut DisplayState, key: Key) {
    match key {
        Key::Char('j') | Key::Down => state.overlay.scroll_down(1),
        Key::Char('k') | Key::Up => state.overlay.scroll_up(1),
        Key::HalfPageDown => state.overlay.scroll_down(HALF_PAGE),
        Key::HalfPageUp => state.overlay.scroll_up(HALF_PAGE),
        Key::PageDown => state.overlay.scroll_down(FULL_PAGE),
        Key::PageUp => state.overlay.scroll_up(FULL_PAGE),
        Key::Char('g') | Key::Home => state.overlay.scroll_top(),
        Key::Char('G') | Key::End => state.overlay.scroll_bottom(),

        Key::Enter => {
            if let Some(currency) = state.overlay.selected_currency() {
                state.commit_currency(currency);
            }
            state.overlay_active = false;
        }
        Key::Esc => state.overlay_active = false,

        _ => {}
    }
}
