//! # coinwatch
//!
//! Terminal tracker for crypto assets. Four independent pollers feed one
//! view loop over channels; the loop owns all display state and drives a
//! terminal renderer.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Shared** — newtypes, history intervals, formatting helpers
//! 2. **Transport** — `http` (REST providers), `ws` (live price stream)
//! 3. **Polling** — the `poll` scheduler plus one `domain` slice per source
//! 4. **View** — event multiplexer, display state, currency overlay
//! 5. **Frontend** — `tui` renderer and terminal guard
//!
//! Data flows one way: pollers → channels → view loop → display state →
//! renderer. The only traffic in the other direction is the history
//! interval selector, published by the view loop on a single-slot channel.

// ── Layer 1: Shared ──────────────────────────────────────────────────────────

/// Shared newtypes and formatting utilities.
pub mod shared;

/// Crate-wide error types, split by transport layer.
pub mod error;

/// Network endpoint constants.
pub mod network;

// ── Layer 2: Transport ───────────────────────────────────────────────────────

/// HTTP client for the REST providers, with explicit retry policies.
pub mod http;

/// Live price stream over the provider websocket.
pub mod ws;

// ── Layer 3: Polling ─────────────────────────────────────────────────────────

/// Fixed-interval poll scheduler.
pub mod poll;

/// Domain slices for each polled data source.
pub mod domain;

// ── Layer 4: View ────────────────────────────────────────────────────────────

/// The event multiplexer and the display state it owns.
pub mod view;

// ── Layer 5: Frontend ────────────────────────────────────────────────────────

/// Terminal frontend: crossterm screen management + ratatui renderer.
pub mod tui;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    pub use crate::domain::{AssetDetail, PollResult};
    pub use crate::error::{AppError, HttpError, WsError};
    pub use crate::http::{MarketHttp, RetryConfig, RetryPolicy};
    pub use crate::shared::{AssetId, Interval};
    pub use crate::view::input::{Key, UiEvent};
    pub use crate::view::state::DisplayState;
    pub use crate::view::{run_view, Renderer, ViewChannels};
}

pub use error::AppError;
