//! Low-level HTTP client — `MarketHttp`.
//!
//! One method per consumed endpoint, returning wire types. Conversion to
//! domain values happens in the owning domain slice. All endpoints are
//! GETs against unauthenticated public providers.

use crate::domain::detail::wire::AssetEnvelope;
use crate::domain::history::wire::AssetHistory;
use crate::domain::snapshot::wire::MarketRow;
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::network;
use crate::shared::{AssetId, Interval};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Row ordering accepted by the batched markets endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketOrder {
    MarketCapDesc,
    MarketCapAsc,
}

impl MarketOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarketCapDesc => "market_cap_desc",
            Self::MarketCapAsc => "market_cap_asc",
        }
    }
}

/// Parameters for one batched markets query.
#[derive(Debug, Clone)]
pub struct MarketsQuery {
    /// Quote currency, e.g. `"usd"`.
    pub currency: String,
    pub order: MarketOrder,
    pub ids: Vec<AssetId>,
    pub per_page: usize,
    pub page: u32,
    pub sparkline: bool,
}

/// HTTP client for the two REST providers.
#[derive(Clone)]
pub struct MarketHttp {
    assets_url: String,
    markets_url: String,
    client: Client,
}

impl MarketHttp {
    pub fn new() -> Self {
        Self::with_urls(network::ASSETS_API_URL, network::MARKETS_API_URL)
    }

    /// Point the client at alternative base URLs (tests, mirrors).
    pub fn with_urls(assets_url: &str, markets_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(4)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            assets_url: assets_url.trim_end_matches('/').to_string(),
            markets_url: markets_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    // ── Markets ──────────────────────────────────────────────────────────

    /// One batched current-price query for an explicit identifier list.
    pub async fn markets(
        &self,
        query: &MarketsQuery,
        retry: RetryPolicy,
    ) -> Result<Vec<MarketRow>, HttpError> {
        let ids = query
            .ids
            .iter()
            .map(AssetId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}/coins/markets?vs_currency={}&order={}&ids={}&per_page={}&page={}&sparkline={}",
            self.markets_url,
            query.currency,
            query.order.as_str(),
            urlencoding::encode(&ids),
            query.per_page,
            query.page,
            query.sparkline,
        );
        self.get(&url, retry).await
    }

    // ── Assets ───────────────────────────────────────────────────────────

    /// Chronological price series for one asset at one interval.
    pub async fn asset_history(
        &self,
        id: &AssetId,
        interval: Interval,
        retry: RetryPolicy,
    ) -> Result<AssetHistory, HttpError> {
        let url = format!(
            "{}/assets/{}/history?interval={}",
            self.assets_url,
            id,
            interval.as_str()
        );
        self.get(&url, retry).await
    }

    /// Detail URL for one asset. Callers polling a fixed asset build this
    /// once and reuse it with [`MarketHttp::asset_detail_at`].
    pub fn asset_detail_url(&self, id: &AssetId) -> String {
        format!("{}/assets/{}", self.assets_url, id)
    }

    /// Full record for the asset behind a prebuilt detail URL.
    pub async fn asset_detail_at(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<AssetEnvelope, HttpError> {
        self.get(url, retry).await
    }

    /// Full record for one asset.
    pub async fn asset_detail(
        &self,
        id: &AssetId,
        retry: RetryPolicy,
    ) -> Result<AssetEnvelope, HttpError> {
        self.asset_detail_at(&self.asset_detail_url(id), retry).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match retry {
            RetryPolicy::None => return self.do_get(url).await,
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(config) => config,
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_get::<T>(url).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    let retryable = match &err {
                        HttpError::ServerError { status, .. } => {
                            config.retryable_statuses.contains(status)
                        }
                        HttpError::RateLimited { retry_after_ms } => {
                            if let Some(ms) = retry_after_ms {
                                tokio::time::sleep(Duration::from_millis(*ms)).await;
                            }
                            true
                        }
                        HttpError::Reqwest(req_err) => {
                            req_err.is_connect() || req_err.is_timeout() || req_err.is_request()
                        }
                        _ => false,
                    };

                    if retryable && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying request to {}",
                            url
                        );
                        tokio::time::sleep(delay).await;
                        last_error = Some(err);
                    } else {
                        return Err(err);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();

        match status_code {
            404 => Err(HttpError::NotFound(body)),
            429 => Err(HttpError::RateLimited {
                retry_after_ms: None,
            }),
            400..=499 => Err(HttpError::BadRequest(body)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body,
            }),
        }
    }
}

impl Default for MarketHttp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_urls_trim_trailing_slash() {
        let http = MarketHttp::with_urls("https://assets.test/", "https://markets.test/");
        assert_eq!(
            http.asset_detail_url(&AssetId::from("bitcoin")),
            "https://assets.test/assets/bitcoin"
        );
        assert_eq!(http.markets_url, "https://markets.test");
    }

    #[test]
    fn test_market_order_wire_names() {
        assert_eq!(MarketOrder::MarketCapDesc.as_str(), "market_cap_desc");
        assert_eq!(MarketOrder::MarketCapAsc.as_str(), "market_cap_asc");
    }
}
