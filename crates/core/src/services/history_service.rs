use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

use crate::models::analytics::BalanceSummary;
use crate::models::chart::{PortfolioHistory, TimeSeriesPoint};
use crate::services::random::RandomSource;

/// Investment share above which the portfolio is treated as volatile.
pub const SIGNIFICANT_INVESTMENT_SHARE: f64 = 0.3;

/// Noise amplitude (fraction of current value) for investment-heavy portfolios.
pub const HIGH_VOLATILITY: f64 = 0.08;

/// Noise amplitude (fraction of current value) for cash-heavy portfolios.
pub const LOW_VOLATILITY: f64 = 0.03;

/// How far above the current value a debt-payoff history starts.
pub const DEBT_PAYOFF_PREMIUM: f64 = 0.15;

/// Growth credited to the invested part of the portfolio over the history.
pub const INVESTMENT_GROWTH: f64 = 0.25;

/// Growth credited to the cash part of the portfolio over the history.
pub const CASH_GROWTH: f64 = 0.05;

/// No point may fall below this fraction of the starting value.
pub const FLOOR_RATIO: f64 = 0.7;

/// Synthesizes a monthly performance history when no recorded valuations exist.
///
/// The series is approximate by construction. Only its anchoring is exact:
/// the most recent point always equals the current headline value.
pub struct HistoryService {
    months: usize,
}

impl HistoryService {
    pub fn new(months: usize) -> Self {
        Self {
            months: months.max(1),
        }
    }

    pub fn months(&self) -> usize {
        self.months
    }

    /// Generate the history ending in the month of `as_of`.
    ///
    /// 1. Pick the headline value: net worth, or total assets when net worth is negative
    /// 2. Anchor the start above it (liabilities exceed assets) or below it (growth)
    /// 3. Interpolate linearly, add noise scaled by how invested the portfolio is
    /// 4. Clamp to the floor, then pin the last point to the headline value
    pub fn synthesize(
        &self,
        summary: &BalanceSummary,
        as_of: NaiveDate,
        rng: &mut dyn RandomSource,
    ) -> PortfolioHistory {
        let use_assets_only = summary.use_assets_only();
        let current = summary.headline_value();
        if use_assets_only {
            debug!(
                net_worth = summary.net_worth,
                total_assets = summary.total_assets,
                "negative net worth, headline series tracks total assets"
            );
        }

        let start = self.start_value(summary, current);
        let investment_share = summary.investment_share();
        let volatility = if investment_share > SIGNIFICANT_INVESTMENT_SHARE {
            HIGH_VOLATILITY
        } else {
            LOW_VOLATILITY
        };
        let amplitude = current.abs() * volatility;
        let floor = start * FLOOR_RATIO;

        let last = self.months - 1;
        let points = (0..self.months)
            .map(|i| {
                let period = month_label(as_of, last - i);
                if i == last {
                    return TimeSeriesPoint::new(period, current);
                }
                let t = i as f64 / last as f64;
                let base = start + (current - start) * t;
                let value = (base + rng.symmetric(amplitude)).max(floor);
                TimeSeriesPoint::new(period, value)
            })
            .collect();

        PortfolioHistory {
            points,
            anchor_value: current,
            use_assets_only,
        }
    }

    /// Starting value of the series.
    ///
    /// Debt-heavy portfolios start higher (paying debt down shrinks the headline),
    /// everything else starts lower by a growth factor weighted by composition.
    pub fn start_value(&self, summary: &BalanceSummary, current: f64) -> f64 {
        if summary.total_liabilities > summary.total_assets {
            return current * (1.0 + DEBT_PAYOFF_PREMIUM);
        }
        let investment_share = summary.investment_share();
        let cash_share = if summary.total_assets > 0.0 {
            summary.total_cash / summary.total_assets
        } else {
            0.0
        };
        let growth = investment_share * INVESTMENT_GROWTH + cash_share * CASH_GROWTH;
        current * (1.0 - growth)
    }
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new(24)
    }
}

/// `YYYY-MM` label for the month `back` months before `as_of`.
pub fn month_label(as_of: NaiveDate, back: usize) -> String {
    let first = as_of.with_day(1).unwrap_or(as_of);
    let month = first
        .checked_sub_months(Months::new(back as u32))
        .unwrap_or(first);
    month.format("%Y-%m").to_string()
}
