//! Wire types for the batched markets endpoint.

use serde::Deserialize;

/// One row of the batched markets response. Only the fields the snapshot
/// consumes are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketRow {
    pub id: String,
    pub symbol: String,
    /// Absent for delisted or not-yet-priced assets.
    pub current_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_row() {
        let json = r#"{"id":"bitcoin","symbol":"btc","current_price":29403.12,"market_cap":573000000000}"#;
        let row: MarketRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.symbol, "btc");
        assert_eq!(row.current_price, Some(29403.12));
    }

    #[test]
    fn test_decode_row_with_null_price() {
        let json = r#"{"id":"ghost","symbol":"gho","current_price":null}"#;
        let row: MarketRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.current_price, None);
    }
}
