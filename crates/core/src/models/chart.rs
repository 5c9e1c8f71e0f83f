use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A single data point for portfolio chart rendering.
///
/// The core generates these and the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// `YYYY-MM` for monthly points, `YYYY-MM-DD` for daily,
    /// RFC 3339 timestamp for hourly
    pub period: String,

    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(period: impl Into<String>, value: f64) -> Self {
        Self {
            period: period.into(),
            value,
        }
    }
}

/// The full monthly performance history, oldest first.
///
/// Non-empty, and the last point always equals `anchor_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHistory {
    pub points: Vec<TimeSeriesPoint>,

    /// Current aggregate the series ends at
    pub anchor_value: f64,

    /// Net worth was negative, so the series tracks total assets instead
    pub use_assets_only: bool,
}

impl PortfolioHistory {
    pub fn first_value(&self) -> f64 {
        self.points.first().map(|p| p.value).unwrap_or(self.anchor_value)
    }

    pub fn last_value(&self) -> f64 {
        self.points.last().map(|p| p.value).unwrap_or(self.anchor_value)
    }
}

/// Display window for the performance series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

impl Timeframe {
    pub const ALL_LABELS: [Timeframe; 7] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::SixMonths,
        Timeframe::OneYear,
        Timeframe::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1D",
            Timeframe::OneWeek => "1W",
            Timeframe::OneMonth => "1M",
            Timeframe::ThreeMonths => "3M",
            Timeframe::SixMonths => "6M",
            Timeframe::OneYear => "1Y",
            Timeframe::All => "ALL",
        }
    }

    /// Number of trailing monthly points shown for month-based windows.
    /// `None` for the intraday/daily windows (synthesized) and for `ALL`.
    pub fn trailing_months(&self) -> Option<usize> {
        match self {
            Timeframe::OneMonth => Some(2),
            Timeframe::ThreeMonths => Some(4),
            Timeframe::SixMonths => Some(7),
            Timeframe::OneYear => Some(13),
            _ => None,
        }
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::All
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Timeframe::ALL_LABELS
            .iter()
            .copied()
            .find(|tf| tf.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidTimeframe(s.to_string()))
    }
}

/// All-time performance, always measured over the full history
/// regardless of the selected window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub start_value: f64,

    pub end_value: f64,

    /// end_value - start_value
    pub absolute_change: f64,

    /// (absolute_change / start_value) * 100, or 0 when start_value is 0
    pub percent_change: f64,
}
