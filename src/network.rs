//! Network endpoint constants for the upstream providers.

/// REST API serving per-asset detail records and price history.
pub const ASSETS_API_URL: &str = "https://api.coincap.io/v2";

/// REST API serving the batched markets snapshot.
pub const MARKETS_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Streaming endpoint for live prices. Subscribed per asset via
/// `?assets=<id>`.
pub const LIVE_PRICE_WS_URL: &str = "wss://ws.coincap.io/prices";
