use std::collections::HashMap;

use tracing::debug;

use crate::models::account::NormalizedAccount;
use crate::models::holding::{HoldingItem, SecurityPosition};
use crate::models::linked_item::LinkedItem;
use crate::services::analytics_service::AnalyticsService;

const DOMAIN_LOGO_BASE: &str = "https://logo.clearbit.com";
const TICKER_LOGO_BASE: &str = "https://financialmodelingprep.com/image-stock";

/// Company domains for common tickers, used for domain-based logos.
const TICKER_DOMAINS: &[(&str, &str)] = &[
    ("AAPL", "apple.com"),
    ("MSFT", "microsoft.com"),
    ("GOOGL", "abc.xyz"),
    ("GOOG", "abc.xyz"),
    ("AMZN", "amazon.com"),
    ("META", "meta.com"),
    ("NVDA", "nvidia.com"),
    ("TSLA", "tesla.com"),
    ("BRK.B", "berkshirehathaway.com"),
    ("JPM", "jpmorganchase.com"),
    ("V", "visa.com"),
    ("JNJ", "jnj.com"),
    ("WMT", "walmart.com"),
    ("NFLX", "netflix.com"),
    ("DIS", "disney.com"),
    ("VOO", "vanguard.com"),
    ("VTI", "vanguard.com"),
    ("VXUS", "vanguard.com"),
    ("BND", "vanguard.com"),
    ("SPY", "ssga.com"),
    ("QQQ", "invesco.com"),
    ("IVV", "ishares.com"),
    ("BTC", "bitcoin.org"),
    ("ETH", "ethereum.org"),
];

/// Resolves display logos for securities.
///
/// Ticker → known company domain → domain logo; otherwise a ticker-keyed image;
/// otherwise the generic placeholder.
pub struct LogoResolver {
    domains: HashMap<&'static str, &'static str>,
    generic: String,
}

impl LogoResolver {
    pub fn new(generic: impl Into<String>) -> Self {
        Self {
            domains: TICKER_DOMAINS.iter().copied().collect(),
            generic: generic.into(),
        }
    }

    pub fn resolve(&self, symbol: Option<&str>) -> String {
        let Some(symbol) = symbol.map(str::trim).filter(|s| !s.is_empty()) else {
            return self.generic.clone();
        };
        let upper = symbol.to_uppercase();
        if let Some(domain) = self.domains.get(upper.as_str()) {
            return format!("{DOMAIN_LOGO_BASE}/{domain}");
        }
        if upper.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-') {
            return format!("{TICKER_LOGO_BASE}/{upper}.png");
        }
        self.generic.clone()
    }
}

/// Picks the top-N rows of the holdings panel.
///
/// Real security positions win when any has a positive market value; otherwise
/// the largest non-liability accounts stand in, so the panel is never empty
/// while account data exists.
pub struct HoldingsService {
    limit: usize,
    logos: LogoResolver,
}

impl HoldingsService {
    pub fn new(limit: usize, generic_logo: impl Into<String>) -> Self {
        Self {
            limit,
            logos: LogoResolver::new(generic_logo),
        }
    }

    /// Join raw holdings with their securities, across all items, in received order.
    pub fn collect_positions(&self, items: &[LinkedItem]) -> Vec<SecurityPosition> {
        let mut positions = Vec::new();

        for item in items {
            let Some(holdings) = item.payload.holdings.as_ref() else {
                continue;
            };
            let securities: HashMap<&str, _> = item
                .payload
                .securities
                .iter()
                .flatten()
                .map(|s| (s.security_id.as_str(), s))
                .collect();

            for holding in holdings {
                let security = securities.get(holding.security_id.as_str());
                let symbol = security
                    .and_then(|s| s.ticker_symbol.clone())
                    .filter(|t| !t.trim().is_empty());
                let name = security
                    .and_then(|s| s.name.clone())
                    .filter(|n| !n.trim().is_empty())
                    .or_else(|| symbol.clone())
                    .unwrap_or_else(|| "Unknown security".to_string());
                let market_value = holding
                    .institution_value
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0);

                positions.push(SecurityPosition {
                    symbol,
                    name,
                    market_value,
                });
            }
        }

        positions
    }

    pub fn rank(
        &self,
        positions: &[SecurityPosition],
        accounts: &[NormalizedAccount],
        analytics: &AnalyticsService,
    ) -> Vec<HoldingItem> {
        let securities: Vec<HoldingItem> = positions
            .iter()
            .filter(|p| p.market_value > 0.0)
            .take(self.limit)
            .map(|p| HoldingItem::Security {
                symbol: p.symbol.clone().unwrap_or_default(),
                name: p.name.clone(),
                value: p.market_value,
                logo_url: self.logos.resolve(p.symbol.as_deref()),
            })
            .collect();

        if !securities.is_empty() {
            return securities;
        }

        debug!("no priced security positions, falling back to top accounts");
        self.top_accounts(accounts, analytics)
    }

    /// Largest counted non-liability accounts by absolute balance.
    pub fn top_accounts(
        &self,
        accounts: &[NormalizedAccount],
        analytics: &AnalyticsService,
    ) -> Vec<HoldingItem> {
        let mut candidates: Vec<&NormalizedAccount> = accounts
            .iter()
            .filter(|a| analytics.is_counted_asset(a))
            .collect();
        // Stable: equal balances keep input order
        candidates.sort_by(|a, b| b.magnitude().total_cmp(&a.magnitude()));

        candidates
            .into_iter()
            .take(self.limit)
            .map(|a| HoldingItem::Account {
                account_ref: a.id.clone(),
                name: a.display_name.clone(),
                value: a.magnitude(),
                category: a.category,
                icon: a.category.icon().to_string(),
            })
            .collect()
    }
}
