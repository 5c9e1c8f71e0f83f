pub mod demo;
pub mod errors;
pub mod logging;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use errors::CoreError;
use models::{
    account::NormalizedAccount,
    chart::Timeframe,
    linked_item::{LinkedItem, RawLinkPayload},
    settings::EngineSettings,
    snapshot::{DataMode, Snapshot},
};
use providers::{aggregator::AggregatorClient, traits::AccountDataProvider};
use services::{
    allocation_service::AllocationService, analytics_service::AnalyticsService,
    chart_service::ChartService, history_service::HistoryService,
    holdings_service::HoldingsService, normalizer_service::NormalizerService,
    random::RandomSource,
};
use storage::store::LinkedItemStore;

/// Main entry point for the linked-portfolio core.
///
/// Stateless between passes: every `recompute*` call takes the current linked
/// items and timeframe and returns a fresh [`Snapshot`]. Normalization,
/// classification, totals and allocation are idempotent; the synthesized
/// series is only guaranteed to be anchored (its last point is exact).
#[must_use]
pub struct PortfolioEngine {
    settings: EngineSettings,
    normalizer_service: NormalizerService,
    analytics_service: AnalyticsService,
    history_service: HistoryService,
    chart_service: ChartService,
    holdings_service: HoldingsService,
    allocation_service: AllocationService,
}

impl std::fmt::Debug for PortfolioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioEngine")
            .field("settings", &self.settings)
            .finish()
    }
}

impl PortfolioEngine {
    /// Build an engine, rejecting settings that fail validation.
    pub fn new(settings: EngineSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self::from_valid_settings(settings))
    }

    /// Build from a JSON settings document (validated).
    pub fn from_settings_json(json: &str) -> Result<Self, CoreError> {
        Ok(Self::from_valid_settings(EngineSettings::from_json(json)?))
    }

    fn from_valid_settings(settings: EngineSettings) -> Self {
        Self {
            normalizer_service: NormalizerService::new(settings.generic_institution_logo.clone()),
            analytics_service: AnalyticsService::new(settings.other_accounts_policy),
            history_service: HistoryService::new(settings.history_months),
            chart_service: ChartService::new(),
            holdings_service: HoldingsService::new(
                settings.holdings_limit,
                settings.generic_security_logo.clone(),
            ),
            allocation_service: AllocationService::new(settings.palette.clone()),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // ── Recompute ───────────────────────────────────────────────────

    /// Recompute against the wall clock with thread-local randomness.
    pub fn recompute(&self, items: &[LinkedItem], timeframe: Timeframe, mode: DataMode) -> Snapshot {
        let mut rng = rand::thread_rng();
        self.recompute_with(items, timeframe, mode, Utc::now(), &mut rng)
    }

    /// Recompute with an explicit clock and random source.
    ///
    /// Pipeline: normalize → classify → totals/shares → allocation → holdings
    /// → synthesized history (anchored to the headline value) → window.
    pub fn recompute_with(
        &self,
        items: &[LinkedItem],
        timeframe: Timeframe,
        mode: DataMode,
        as_of: DateTime<Utc>,
        rng: &mut dyn RandomSource,
    ) -> Snapshot {
        let demo_items;
        let items = match mode {
            DataMode::Live => items,
            DataMode::Demo => {
                demo_items = demo::demo_items(as_of);
                demo_items.as_slice()
            }
        };

        let accounts = self.normalize(items);
        let summary = self.analytics_service.summarize(&accounts);
        let shares = self.analytics_service.account_shares(&accounts, &summary);
        let allocation = self.allocation_service.bucketize(
            &accounts,
            summary.total_assets,
            &self.analytics_service,
        );
        let positions = self.holdings_service.collect_positions(items);
        let holdings = self
            .holdings_service
            .rank(&positions, &accounts, &self.analytics_service);

        let history = self
            .history_service
            .synthesize(&summary, as_of.date_naive(), rng);
        let series = self.chart_service.window(&history, timeframe, as_of, rng);
        let performance = self.chart_service.performance(&history);

        info!(
            items = items.len(),
            accounts = accounts.len(),
            net_worth = summary.net_worth,
            timeframe = %timeframe,
            "recomputed portfolio snapshot"
        );

        Snapshot {
            as_of,
            timeframe,
            mode,
            accounts: shares,
            summary,
            history,
            series,
            performance,
            allocation,
            holdings,
        }
    }

    /// Recompute from whatever the store currently lists.
    pub fn recompute_from_store(
        &self,
        store: &dyn LinkedItemStore,
        timeframe: Timeframe,
        mode: DataMode,
    ) -> Result<Snapshot, CoreError> {
        let items = match mode {
            DataMode::Live => store.list()?,
            DataMode::Demo => Vec::new(),
        };
        Ok(self.recompute(&items, timeframe, mode))
    }

    /// Switch the display window of an existing snapshot.
    ///
    /// Keeps the full history (and therefore the all-time figures) as is;
    /// only the windowed series is rebuilt.
    pub fn change_timeframe(
        &self,
        snapshot: &Snapshot,
        timeframe: Timeframe,
        rng: &mut dyn RandomSource,
    ) -> Snapshot {
        let series = self
            .chart_service
            .window(&snapshot.history, timeframe, snapshot.as_of, rng);
        Snapshot {
            timeframe,
            series,
            ..snapshot.clone()
        }
    }

    /// Normalized, classified accounts for a set of items.
    #[must_use]
    pub fn normalize(&self, items: &[LinkedItem]) -> Vec<NormalizedAccount> {
        self.normalizer_service.normalize_items(items)
    }

    // ── Linked-item refresh ─────────────────────────────────────────

    /// Aggregation API client built from the configured credentials, if any.
    #[must_use]
    pub fn aggregator_client(&self) -> Option<AggregatorClient> {
        self.settings.api.clone().map(AggregatorClient::new)
    }

    /// Re-fetch accounts (and holdings, where exposed) for an existing item.
    /// Returns a new item; the input is left untouched.
    pub async fn refresh_item(
        &self,
        provider: &dyn AccountDataProvider,
        item: &LinkedItem,
    ) -> Result<LinkedItem, CoreError> {
        let accounts = provider.fetch_accounts(&item.access_token).await?;
        let holdings = provider.fetch_holdings(&item.access_token).await?;
        debug!(
            item = %item.id,
            provider = provider.name(),
            accounts = accounts.accounts.len(),
            holdings = holdings.holdings.len(),
            "refreshed linked item"
        );

        let has_positions = !holdings.holdings.is_empty();
        let payload = RawLinkPayload {
            accounts: Some(accounts.accounts),
            institution: accounts.institution.or_else(|| item.payload.institution.clone()),
            holdings: has_positions.then_some(holdings.holdings),
            securities: has_positions.then_some(holdings.securities),
        };
        Ok(item.with_payload(payload))
    }
}

impl Default for PortfolioEngine {
    fn default() -> Self {
        Self::from_valid_settings(EngineSettings::default())
    }
}
