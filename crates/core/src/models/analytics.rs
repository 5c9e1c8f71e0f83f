use serde::{Deserialize, Serialize};

/// Net-worth summary for one aggregation pass.
///
/// `total_assets` sums `|balance|` over every counted non-liability account,
/// `total_liabilities` sums `|balance|` over liability accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    /// Always >= 0
    pub total_assets: f64,

    /// Always >= 0
    pub total_liabilities: f64,

    /// total_assets - total_liabilities
    pub net_worth: f64,

    /// Subtotal of the investments category (part of total_assets)
    pub total_investments: f64,

    /// Subtotal of the cash/asset category (part of total_assets)
    pub total_cash: f64,
}

impl BalanceSummary {
    /// Share of `total_assets` held in investment accounts, in `[0, 1]`.
    pub fn investment_share(&self) -> f64 {
        if self.total_assets > 0.0 {
            self.total_investments / self.total_assets
        } else {
            0.0
        }
    }

    /// True when net worth is negative and the headline series
    /// must track assets instead.
    pub fn use_assets_only(&self) -> bool {
        self.net_worth < 0.0
    }

    /// The value the headline series ends at.
    pub fn headline_value(&self) -> f64 {
        if self.use_assets_only() {
            self.total_assets
        } else {
            self.net_worth
        }
    }
}
