//! Wire types for the asset detail endpoint.

use serde::Deserialize;

/// Full record for one asset, numeric fields as provider strings.
///
/// Strings stay unparsed here so one malformed field degrades only its own
/// display cell, never the whole record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub rank: String,
    pub symbol: String,
    pub name: String,
    pub supply: String,
    pub max_supply: Option<String>,
    pub market_cap_usd: String,
    pub volume_usd_24_hr: String,
    pub price_usd: String,
    pub change_percent_24_hr: String,
    pub vwap_24_hr: Option<String>,
    pub explorer: Option<String>,
}

/// Response envelope: the record plus the provider's timestamp (ms).
#[derive(Debug, Clone, Deserialize)]
pub struct AssetEnvelope {
    pub data: Asset,
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BITCOIN: &str = r#"{
        "data": {
            "id": "bitcoin",
            "rank": "1",
            "symbol": "BTC",
            "name": "Bitcoin",
            "supply": "19437218.0000000000000000",
            "maxSupply": "21000000.0000000000000000",
            "marketCapUsd": "573829207162.7425935918345954",
            "volumeUsd24Hr": "5447121921.2746907538833083",
            "priceUsd": "29522.7932239121391771",
            "changePercent24Hr": "-0.0638237",
            "vwap24Hr": "29538.2695716955517825",
            "explorer": "https://blockchain.info/"
        },
        "timestamp": 1690000000000
    }"#;

    #[test]
    fn test_decode_envelope() {
        let envelope: AssetEnvelope = serde_json::from_str(BITCOIN).unwrap();
        assert_eq!(envelope.data.symbol, "BTC");
        assert_eq!(envelope.data.rank, "1");
        assert_eq!(
            envelope.data.max_supply.as_deref(),
            Some("21000000.0000000000000000")
        );
        assert_eq!(envelope.timestamp, 1_690_000_000_000);
    }

    #[test]
    fn test_decode_tolerates_null_optionals() {
        let json = r#"{
            "data": {
                "id": "obscurecoin",
                "rank": "1900",
                "symbol": "OBS",
                "name": "Obscure",
                "supply": "1000",
                "maxSupply": null,
                "marketCapUsd": "10",
                "volumeUsd24Hr": "0",
                "priceUsd": "0.01",
                "changePercent24Hr": "0",
                "vwap24Hr": null,
                "explorer": null
            },
            "timestamp": 1690000000000
        }"#;
        let envelope: AssetEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.max_supply, None);
        assert_eq!(envelope.data.vwap_24_hr, None);
        assert_eq!(envelope.data.explorer, None);
    }
}
