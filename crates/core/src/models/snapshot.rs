use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::AccountShare;
use super::allocation::AllocationBucket;
use super::analytics::BalanceSummary;
use super::chart::{PerformanceSummary, PortfolioHistory, Timeframe, TimeSeriesPoint};
use super::holding::HoldingItem;

/// Where the linked items for a pass come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    /// The user's real linked items
    #[default]
    Live,
    /// A fixed illustrative dataset
    Demo,
}

/// Immutable result of one recompute pass.
/// Everything the presentation layer renders comes from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub as_of: DateTime<Utc>,
    pub timeframe: Timeframe,
    pub mode: DataMode,
    pub accounts: Vec<AccountShare>,
    pub summary: BalanceSummary,
    /// Full monthly history (never windowed)
    pub history: PortfolioHistory,
    /// Series for the selected timeframe
    pub series: Vec<TimeSeriesPoint>,
    /// All-time figures over the full history
    pub performance: PerformanceSummary,
    pub allocation: Vec<AllocationBucket>,
    pub holdings: Vec<HoldingItem>,
}
