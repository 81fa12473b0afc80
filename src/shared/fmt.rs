//! Number formatting helpers for human-readable display.
//!
//! Large amounts are scaled to a thousands unit so a market cap renders as
//! `"1.23 T"` instead of thirteen digits.

/// Scale a pair of values by the unit of the larger one.
///
/// Both values share one unit so bar charts stay comparable. Returns the
/// scaled pair and the unit suffix (`""`, `"K"`, `"M"`, `"B"`, `"T"`).
pub fn round_pair(a: f64, b: f64) -> ([f64; 2], &'static str) {
    let (divisor, unit) = unit_for(a.abs().max(b.abs()));
    ([a / divisor, b / divisor], unit)
}

/// Format one value with its unit, e.g. `"12.34 B"`.
pub fn with_unit(value: f64) -> String {
    let ([scaled, _], unit) = round_pair(value, 0.0);
    if unit.is_empty() {
        format!("{:.2}", scaled)
    } else {
        format!("{:.2} {}", scaled, unit)
    }
}

fn unit_for(value: f64) -> (f64, &'static str) {
    if value >= 1e12 {
        (1e12, "T")
    } else if value >= 1e9 {
        (1e9, "B")
    } else if value >= 1e6 {
        (1e6, "M")
    } else if value >= 1e3 {
        (1e3, "K")
    } else {
        (1.0, "")
    }
}
