//! Display state owned by the view loop.
//!
//! Derived entirely from the sequence of poll results and price updates,
//! applied in arrival order. Nothing outside the loop mutates it; the
//! renderer only reads.

use crate::domain::AssetDetail;
use crate::shared::fmt;
use crate::shared::Interval;
use crate::view::currency::{Currency, CurrencyOverlay, USD};

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const UP_GLYPH: &str = "▲";
pub const DOWN_GLYPH: &str = "▼";

/// Sort column + direction for the favourites table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub ascending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Symbol,
    Price,
}

/// One favourites row; the price is already currency-scaled.
#[derive(Debug, Clone, PartialEq)]
pub struct FavouriteRow {
    pub symbol: String,
    pub price: f64,
}

/// Everything the renderer reads.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    // Favourites table
    pub favourites: Vec<FavouriteRow>,
    pub sort: Option<SortSpec>,
    pub favourites_cursor: usize,

    // History chart
    pub chart_series: Vec<f64>,
    pub chart_min_label: String,
    pub chart_max_label: String,
    pub interval: Interval,

    // Detail-derived fields
    pub name: String,
    pub symbol: String,
    pub rank: String,
    pub market_cap: String,
    pub vwap: String,
    pub explorer: String,
    pub volume_percent: u16,
    pub supply_values: [f64; 2],
    pub supply_unit: &'static str,
    pub asset_value_label: String,
    pub change: String,
    pub retrieved_at: Option<DateTime<Utc>>,

    // Live price
    pub live_price: String,

    // Currency
    pub currency: Currency,

    // Overlay
    pub overlay_active: bool,
    pub overlay: CurrencyOverlay,
}

impl DisplayState {
    pub fn new() -> Self {
        Self {
            favourites: Vec::new(),
            sort: None,
            favourites_cursor: 0,
            chart_series: Vec::new(),
            chart_min_label: String::new(),
            chart_max_label: String::new(),
            interval: Interval::default(),
            name: String::new(),
            symbol: String::new(),
            rank: String::new(),
            market_cap: String::new(),
            vwap: String::new(),
            explorer: String::new(),
            volume_percent: 0,
            supply_values: [0.0, 0.0],
            supply_unit: "",
            asset_value_label: String::new(),
            change: "NA".to_string(),
            retrieved_at: None,
            live_price: String::new(),
            currency: USD,
            overlay_active: false,
            overlay: CurrencyOverlay::compact(),
        }
    }

    // ── Poll result transitions ──────────────────────────────────────────

    /// Snapshot → replace the favourites rows and reapply the active sort.
    pub fn apply_snapshot(&mut self, prices: HashMap<String, f64>) {
        let rate = self.currency.rate_usd;
        self.favourites = prices
            .into_iter()
            .map(|(symbol, price)| FavouriteRow {
                symbol,
                price: price / rate,
            })
            .collect();
        self.resort();
    }

    /// History → replace the chart series and extreme labels.
    ///
    /// The series arrives already baseline-zeroed; the labels carry the
    /// untransformed extremes, scaled into the active currency.
    pub fn apply_history(&mut self, series: Vec<f64>, min: f64, max: f64) {
        self.chart_series = series;
        self.chart_min_label = self.money_label(min);
        self.chart_max_label = self.money_label(max);
    }

    /// Detail → recompute every derived field from the raw record.
    ///
    /// Parsing is per-field: a malformed field keeps its previous
    /// rendering while everything else still updates.
    pub fn apply_detail(&mut self, detail: &AssetDetail) {
        let asset = &detail.asset;

        self.name = asset.name.clone();
        self.symbol = asset.symbol.clone();
        self.rank = asset.rank.clone();
        self.explorer = asset.explorer.clone().unwrap_or_default();
        self.retrieved_at = Some(detail.retrieved_at);

        let market_cap = asset.market_cap_usd.parse::<f64>().ok();
        if let Some(cap) = market_cap {
            let (values, unit) = fmt::round_pair(cap, 0.0);
            let scaled = format!("{:.2}", values[0] / self.currency.rate_usd);
            let label = self.currency.label();
            self.market_cap = join_label(&[scaled.as_str(), unit, label.as_str()]);
        }

        if let Some(vwap) = asset
            .vwap_24_hr
            .as_deref()
            .and_then(|raw| raw.parse::<f64>().ok())
        {
            self.vwap = self.money_label(vwap);
        }

        if let Ok(price) = asset.price_usd.parse::<f64>() {
            self.asset_value_label = self.money_label(price);
        }

        // Volume as a share of market cap; a zero cap keeps the prior
        // gauge value rather than dividing.
        if let (Ok(volume), Some(cap)) = (asset.volume_usd_24_hr.parse::<f64>(), market_cap) {
            if cap > 0.0 {
                let percent = (volume / cap * 100.0) as i64;
                if (0..=100).contains(&percent) {
                    self.volume_percent = percent as u16;
                }
            }
        }

        // Supply bars share one dynamically chosen unit.
        let supply = asset.supply.parse::<f64>().ok();
        let max_supply = asset
            .max_supply
            .as_deref()
            .and_then(|raw| raw.parse::<f64>().ok());
        if let (Some(supply), Some(max_supply)) = (supply, max_supply) {
            let (values, unit) = fmt::round_pair(supply, max_supply);
            self.supply_values = values;
            self.supply_unit = unit;
        }

        if let Ok(change) = asset.change_percent_24_hr.parse::<f64>() {
            self.change = change_label(change);
        }
    }

    /// Price update → overwrite only the live price label.
    pub fn apply_live_price(&mut self, raw: &str) {
        if let Ok(price) = raw.parse::<f64>() {
            self.live_price = self.money_label(price);
        }
    }

    // ── Input transitions ────────────────────────────────────────────────

    /// Commit a currency selection; the factor and label apply to all
    /// subsequent scalings. A malformed rate is absorbed and the prior
    /// currency stays active.
    pub fn commit_currency(&mut self, currency: Currency) {
        if currency.rate_usd.is_finite() && currency.rate_usd > 0.0 {
            self.currency = currency;
        }
    }

    /// Choose a sort column + direction and apply it immediately.
    pub fn set_sort(&mut self, column: SortColumn, ascending: bool) {
        self.sort = Some(SortSpec { column, ascending });
        self.resort();
    }

    pub fn cursor_down(&mut self, by: usize) {
        if !self.favourites.is_empty() {
            self.favourites_cursor = (self.favourites_cursor + by).min(self.favourites.len() - 1);
        }
    }

    pub fn cursor_up(&mut self, by: usize) {
        self.favourites_cursor = self.favourites_cursor.saturating_sub(by);
    }

    pub fn cursor_top(&mut self) {
        self.favourites_cursor = 0;
    }

    pub fn cursor_bottom(&mut self) {
        self.favourites_cursor = self.favourites.len().saturating_sub(1);
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn resort(&mut self) {
        let spec = self.sort.unwrap_or(SortSpec {
            column: SortColumn::Symbol,
            ascending: true,
        });
        sort_rows(&mut self.favourites, spec);
        self.favourites_cursor = self
            .favourites_cursor
            .min(self.favourites.len().saturating_sub(1));
    }

    fn money_label(&self, usd_value: f64) -> String {
        format!(
            "{:.2} {}",
            usd_value / self.currency.rate_usd,
            self.currency.label()
        )
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable comparison on the chosen column.
fn sort_rows(rows: &mut [FavouriteRow], spec: SortSpec) {
    rows.sort_by(|a, b| {
        let ord = match spec.column {
            SortColumn::Symbol => a.symbol.cmp(&b.symbol),
            SortColumn::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
        };
        if spec.ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

fn change_label(change: f64) -> String {
    if change < 0.0 {
        format!("{} {:.2}", DOWN_GLYPH, -change)
    } else {
        format!("{} {:.2}", UP_GLYPH, change)
    }
}

/// Join non-empty parts with single spaces.
fn join_label(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
