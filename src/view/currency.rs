//! Currency selection overlay.
//!
//! Every displayed amount is divided by the active currency's USD rate and
//! tagged with its label. Rates here are indicative constants; live rate
//! polling is out of scope for this view.

/// One selectable currency. `rate_usd` is the US dollar value of one unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub rate_usd: f64,
}

impl Currency {
    /// Label rendered next to amounts, e.g. `"USD $"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.code, self.symbol)
    }
}

/// Default display currency.
pub const USD: Currency = Currency {
    code: "USD",
    symbol: "$",
    rate_usd: 1.0,
};

/// The full overlay table.
pub const ALL_CURRENCIES: &[Currency] = &[
    USD,
    Currency { code: "EUR", symbol: "€", rate_usd: 1.08 },
    Currency { code: "GBP", symbol: "£", rate_usd: 1.27 },
    Currency { code: "JPY", symbol: "¥", rate_usd: 0.0068 },
    Currency { code: "CNY", symbol: "¥", rate_usd: 0.14 },
    Currency { code: "INR", symbol: "₹", rate_usd: 0.012 },
    Currency { code: "AUD", symbol: "$", rate_usd: 0.66 },
    Currency { code: "CAD", symbol: "$", rate_usd: 0.73 },
    Currency { code: "CHF", symbol: "Fr", rate_usd: 1.13 },
    Currency { code: "KRW", symbol: "₩", rate_usd: 0.00073 },
    Currency { code: "BRL", symbol: "R$", rate_usd: 0.18 },
    Currency { code: "RUB", symbol: "₽", rate_usd: 0.011 },
];

/// The compact table: majors only.
pub const COMMON_CURRENCIES: &[Currency] = &[
    USD,
    Currency { code: "EUR", symbol: "€", rate_usd: 1.08 },
    Currency { code: "GBP", symbol: "£", rate_usd: 1.27 },
    Currency { code: "JPY", symbol: "¥", rate_usd: 0.0068 },
    Currency { code: "INR", symbol: "₹", rate_usd: 0.012 },
];

/// Overlay rows plus a scroll cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyOverlay {
    pub rows: &'static [Currency],
    pub selected: usize,
}

impl CurrencyOverlay {
    /// Majors-only table (the `c` key).
    pub fn compact() -> Self {
        Self {
            rows: COMMON_CURRENCIES,
            selected: 0,
        }
    }

    /// Full table (the `C` key).
    pub fn all() -> Self {
        Self {
            rows: ALL_CURRENCIES,
            selected: 0,
        }
    }

    pub fn scroll_down(&mut self, by: usize) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + by).min(self.rows.len() - 1);
        }
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.selected = self.selected.saturating_sub(by);
    }

    pub fn scroll_top(&mut self) {
        self.selected = 0;
    }

    pub fn scroll_bottom(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    pub fn selected_currency(&self) -> Option<Currency> {
        self.rows.get(self.selected).copied()
    }
}

impl Default for CurrencyOverlay {
    fn default() -> Self {
        Self::compact()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_clamps_at_both_ends() {
        let mut overlay = CurrencyOverlay::all();
        overlay.scroll_up(3);
        assert_eq!(overlay.selected, 0);

        overlay.scroll_down(1000);
        assert_eq!(overlay.selected, overlay.rows.len() - 1);

        overlay.scroll_top();
        assert_eq!(overlay.selected, 0);
        overlay.scroll_bottom();
        assert_eq!(overlay.selected, overlay.rows.len() - 1);
    }

    #[test]
    fn test_selected_currency_follows_cursor() {
        let mut overlay = CurrencyOverlay::all();
        overlay.scroll_down(1);
        let selected = overlay.selected_currency().unwrap();
        assert_eq!(selected.code, ALL_CURRENCIES[1].code);
    }

    #[test]
    fn test_usd_label() {
        assert_eq!(USD.label(), "USD $");
    }
}
