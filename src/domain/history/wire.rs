//! Wire types for the asset history endpoint.

use serde::Deserialize;

/// One point of the chronological price series.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPoint {
    #[serde(rename = "priceUsd")]
    pub price_usd: String,
    /// Unix timestamp in milliseconds.
    pub time: i64,
}

/// Response envelope for the history query.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetHistory {
    pub data: Vec<HistoryPoint>,
}
