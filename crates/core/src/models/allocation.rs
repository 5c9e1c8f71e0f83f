use serde::{Deserialize, Serialize};

use super::account::Category;

/// One colored allocation segment for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBucket {
    pub label: String,

    /// Never `Liabilities`
    pub category: Category,

    /// Sum of `|balance|` of member accounts (>= 0)
    pub value: f64,

    /// Share of total assets, in [0, 100]
    pub percentage_of_total: f64,

    /// Hex color from the configured palette
    pub color: String,

    pub member_account_ids: Vec<String>,
}
