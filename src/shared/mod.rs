//! Shared newtypes and utilities used across the crate.
//!
//! These types are serialization-transparent: they serialize and
//! deserialize identically to the raw strings the providers send, so they
//! can sit directly in wire types without conversion overhead.

pub mod fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── AssetId ─────────────────────────────────────────────────────────────────

/// Newtype for provider asset identifiers (e.g. `"bitcoin"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for AssetId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AssetId(s.to_string()))
    }
}

impl Serialize for AssetId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(AssetId(s))
    }
}

// ─── Interval ────────────────────────────────────────────────────────────────

/// History window granularity accepted by the assets API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "m1")]
    Minute1,
    #[serde(rename = "m5")]
    Minute5,
    #[serde(rename = "m15")]
    Minute15,
    #[serde(rename = "m30")]
    Minute30,
    #[serde(rename = "h1")]
    Hour1,
    #[serde(rename = "h2")]
    Hour2,
    #[serde(rename = "h6")]
    Hour6,
    #[serde(rename = "h12")]
    Hour12,
    #[default]
    #[serde(rename = "d1")]
    Day1,
}

impl Interval {
    /// Every interval, finest first.
    pub const ALL: [Interval; 9] = [
        Self::Minute1,
        Self::Minute5,
        Self::Minute15,
        Self::Minute30,
        Self::Hour1,
        Self::Hour2,
        Self::Hour6,
        Self::Hour12,
        Self::Day1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "m1",
            Self::Minute5 => "m5",
            Self::Minute15 => "m15",
            Self::Minute30 => "m30",
            Self::Hour1 => "h1",
            Self::Hour2 => "h2",
            Self::Hour6 => "h6",
            Self::Hour12 => "h12",
            Self::Day1 => "d1",
        }
    }

    /// Human label shown in the chart title.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Minute1 => "1 min",
            Self::Minute5 => "5 min",
            Self::Minute15 => "15 min",
            Self::Minute30 => "30 min",
            Self::Hour1 => "1 hour",
            Self::Hour2 => "2 hours",
            Self::Hour6 => "6 hours",
            Self::Hour12 => "12 hours",
            Self::Day1 => "1 day",
        }
    }

    /// Next coarser interval, wrapping to the finest.
    pub fn cycle_up(&self) -> Interval {
        let pos = Self::ALL.iter().position(|i| i == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    /// Next finer interval, wrapping to the coarsest.
    pub fn cycle_down(&self) -> Interval {
        let pos = Self::ALL.iter().position(|i| i == self).unwrap_or(0);
        Self::ALL[(pos + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_serde_transparent() {
        let id = AssetId::from("bitcoin");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bitcoin\"");
        let back: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_interval_serde() {
        let i: Interval = serde_json::from_str("\"h12\"").unwrap();
        assert_eq!(i, Interval::Hour12);
        assert_eq!(i.as_str(), "h12");
    }

    #[test]
    fn test_interval_default_is_one_day() {
        assert_eq!(Interval::default(), Interval::Day1);
        assert_eq!(Interval::default().label(), "1 day");
    }

    #[test]
    fn test_interval_cycle_wraps() {
        assert_eq!(Interval::Day1.cycle_up(), Interval::Minute1);
        assert_eq!(Interval::Minute1.cycle_down(), Interval::Day1);
        assert_eq!(Interval::Hour1.cycle_up(), Interval::Hour2);
        assert_eq!(Interval::Hour2.cycle_down(), Interval::Hour1);
    }
}
