use crate::models::account::{AccountShare, Category, NormalizedAccount};
use crate::models::analytics::BalanceSummary;
use crate::models::settings::OtherAccountsPolicy;

/// Computes balance totals, net worth and per-account share of the portfolio.
///
/// Pure business logic, no I/O. Liabilities never enter the asset side.
pub struct AnalyticsService {
    other_policy: OtherAccountsPolicy,
}

impl AnalyticsService {
    pub fn new(other_policy: OtherAccountsPolicy) -> Self {
        Self { other_policy }
    }

    /// Whether an account contributes to totals under the current policy.
    /// Liabilities are always counted (on the liability side).
    pub fn is_counted(&self, account: &NormalizedAccount) -> bool {
        account.category != Category::Other
            || self.other_policy == OtherAccountsPolicy::CountAsAssets
    }

    /// Whether an account counts towards `total_assets`.
    pub fn is_counted_asset(&self, account: &NormalizedAccount) -> bool {
        !account.is_liability() && self.is_counted(account)
    }

    pub fn summarize(&self, accounts: &[NormalizedAccount]) -> BalanceSummary {
        let mut summary = BalanceSummary::default();

        for account in accounts.iter().filter(|a| self.is_counted(a)) {
            let magnitude = account.magnitude();
            match account.category {
                Category::Liabilities => summary.total_liabilities += magnitude,
                Category::Investments => {
                    summary.total_assets += magnitude;
                    summary.total_investments += magnitude;
                }
                Category::Assets => {
                    summary.total_assets += magnitude;
                    summary.total_cash += magnitude;
                }
                Category::Other => summary.total_assets += magnitude,
            }
        }

        summary.net_worth = summary.total_assets - summary.total_liabilities;
        summary
    }

    /// Attach `percentage_of_total` to every account, preserving order.
    ///
    /// Liabilities and excluded accounts get 0; everything is 0 when
    /// `total_assets` is 0.
    pub fn account_shares(
        &self,
        accounts: &[NormalizedAccount],
        summary: &BalanceSummary,
    ) -> Vec<AccountShare> {
        accounts
            .iter()
            .map(|account| {
                let counted_asset = self.is_counted_asset(account);
                let percentage_of_total = if counted_asset && summary.total_assets > 0.0 {
                    (account.magnitude() / summary.total_assets) * 100.0
                } else {
                    0.0
                };
                AccountShare {
                    account: account.clone(),
                    percentage_of_total,
                    is_liability: account.is_liability(),
                    counted: self.is_counted(account),
                }
            })
            .collect()
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new(OtherAccountsPolicy::CountAsAssets)
    }
}
