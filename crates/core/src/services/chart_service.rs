use chrono::{DateTime, Duration, DurationRound, Utc};

use crate::models::chart::{PerformanceSummary, PortfolioHistory, Timeframe, TimeSeriesPoint};
use crate::services::random::RandomSource;

/// Intraday noise amplitude as a fraction of the current value.
pub const HOURLY_NOISE: f64 = 0.02;

/// Daily noise amplitude as a fraction of the current value.
pub const DAILY_NOISE: f64 = 0.04;

pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_WEEK: usize = 7;

/// Turns the full monthly history into the series for a display window.
///
/// The core computes all the numbers; the frontend only renders.
/// - `1D` / `1W`: synthesized hourly / daily points around the current value
/// - `1M` .. `1Y`: trailing slice of the monthly history
/// - `ALL`: the whole history
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Series for `timeframe`. Always non-empty and oldest-first.
    pub fn window(
        &self,
        history: &PortfolioHistory,
        timeframe: Timeframe,
        as_of: DateTime<Utc>,
        rng: &mut dyn RandomSource,
    ) -> Vec<TimeSeriesPoint> {
        let current = history.anchor_value;

        let series = match timeframe {
            Timeframe::OneDay => {
                let end = as_of
                    .duration_trunc(Duration::hours(1))
                    .unwrap_or(as_of);
                Self::around_current(current, HOURS_PER_DAY, HOURLY_NOISE, rng, |back| {
                    (end - Duration::hours(back as i64))
                        .format("%Y-%m-%dT%H:00:00Z")
                        .to_string()
                })
            }
            Timeframe::OneWeek => {
                let end = as_of.date_naive();
                Self::around_current(current, DAYS_PER_WEEK, DAILY_NOISE, rng, |back| {
                    (end - Duration::days(back as i64))
                        .format("%Y-%m-%d")
                        .to_string()
                })
            }
            Timeframe::All => history.points.clone(),
            tf => {
                let n = tf.trailing_months().unwrap_or(history.points.len());
                let skip = history.points.len().saturating_sub(n);
                history.points[skip..].to_vec()
            }
        };

        if series.is_empty() {
            return vec![TimeSeriesPoint::new(
                as_of.format("%Y-%m").to_string(),
                current,
            )];
        }
        series
    }

    /// All-time change over the full history. Never uses a windowed slice,
    /// so a short window can't produce a misleading "all-time" figure.
    pub fn performance(&self, history: &PortfolioHistory) -> PerformanceSummary {
        let start_value = history.first_value();
        let end_value = history.last_value();
        let absolute_change = end_value - start_value;
        let percent_change = if start_value != 0.0 {
            (absolute_change / start_value.abs()) * 100.0
        } else {
            0.0
        };

        PerformanceSummary {
            start_value,
            end_value,
            absolute_change,
            percent_change,
        }
    }

    /// `count` points ending at `current`, each earlier one jittered by up to
    /// `noise × current`. `label(back)` names the point `back` steps before the end.
    fn around_current(
        current: f64,
        count: usize,
        noise: f64,
        rng: &mut dyn RandomSource,
        label: impl Fn(usize) -> String,
    ) -> Vec<TimeSeriesPoint> {
        let amplitude = current.abs() * noise;
        (0..count)
            .map(|i| {
                let back = count - 1 - i;
                let value = if back == 0 {
                    current
                } else {
                    current + rng.symmetric(amplitude)
                };
                TimeSeriesPoint::new(label(back), value)
            })
            .collect()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
