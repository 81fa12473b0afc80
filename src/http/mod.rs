//! HTTP transport: one client for both REST providers, with retry policies
//! passed explicitly at every call site.

mod client;
pub mod retry;

pub use client::{MarketHttp, MarketOrder, MarketsQuery};
pub use retry::{RetryConfig, RetryPolicy};
