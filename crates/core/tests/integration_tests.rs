use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use linked_portfolio_core::errors::CoreError;
use linked_portfolio_core::models::account::Category;
use linked_portfolio_core::models::chart::Timeframe;
use linked_portfolio_core::models::holding::HoldingItem;
use linked_portfolio_core::models::linked_item::{
    LinkedItem, RawAccount, RawBalances, RawHolding, RawInstitution, RawLinkPayload, RawSecurity,
};
use linked_portfolio_core::models::settings::{EngineSettings, OtherAccountsPolicy};
use linked_portfolio_core::models::snapshot::{DataMode, Snapshot};
use linked_portfolio_core::providers::traits::{
    AccountDataProvider, AccountsResponse, HoldingsResponse,
};
use linked_portfolio_core::services::random::FixedRandom;
use linked_portfolio_core::storage::store::{LinkedItemStore, MemoryItemStore};
use linked_portfolio_core::PortfolioEngine;

// ═══════════════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════════════

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 9, 30, 0).unwrap()
}

fn raw(id: &str, account_type: &str, subtype: &str, current: f64) -> RawAccount {
    RawAccount {
        account_id: id.into(),
        name: Some(format!("{subtype} {id}")),
        official_name: None,
        account_type: account_type.into(),
        subtype: Some(subtype.into()),
        balances: RawBalances {
            current: Some(current),
            available: None,
            iso_currency_code: Some("USD".into()),
        },
        mask: None,
    }
}

fn item(institution: &str, accounts: Vec<RawAccount>) -> LinkedItem {
    LinkedItem::new(
        format!("access-{institution}"),
        institution,
        RawLinkPayload {
            accounts: Some(accounts),
            institution: Some(RawInstitution {
                name: Some(institution.into()),
                logo: None,
                url: None,
            }),
            holdings: None,
            securities: None,
        },
    )
}

fn recompute(engine: &PortfolioEngine, items: &[LinkedItem], tf: Timeframe) -> Snapshot {
    engine.recompute_with(items, tf, DataMode::Live, as_of(), &mut StdRng::seed_from_u64(11))
}

// ═══════════════════════════════════════════════════════════════════
// End-to-end scenarios
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_investment_and_student_loan() {
    let items = vec![item(
        "Acme Financial",
        vec![
            raw("inv-1", "investment", "brokerage", 10_000.0),
            raw("loan-1", "loan", "student", 3_000.0),
        ],
    )];
    let snap = recompute(&PortfolioEngine::default(), &items, Timeframe::All);

    assert_eq!(snap.summary.total_assets, 10_000.0);
    assert_eq!(snap.summary.total_liabilities, 3_000.0);
    assert_eq!(snap.summary.net_worth, 7_000.0);

    assert_eq!(snap.allocation.len(), 1);
    assert_eq!(snap.allocation[0].category, Category::Investments);
    assert_eq!(snap.allocation[0].value, 10_000.0);
    assert_eq!(snap.allocation[0].percentage_of_total, 100.0);

    assert_eq!(snap.holdings.len(), 1);
    match &snap.holdings[0] {
        HoldingItem::Account { value, category, .. } => {
            assert_eq!(*value, 10_000.0);
            assert_eq!(*category, Category::Investments);
        }
        other => panic!("expected account fallback, got {other:?}"),
    }

    assert!(!snap.history.use_assets_only);
    assert_eq!(snap.history.points.last().unwrap().value, 7_000.0);
}

#[test]
fn test_negative_net_worth_headline_tracks_assets() {
    let items = vec![item(
        "Acme Financial",
        vec![
            raw("chk", "depository", "checking", 5_000.0),
            raw("mortgage", "loan", "mortgage", 20_000.0),
        ],
    )];
    let snap = recompute(&PortfolioEngine::default(), &items, Timeframe::All);

    assert_eq!(snap.summary.net_worth, -15_000.0);
    assert!(snap.history.use_assets_only);
    assert_eq!(snap.history.points.last().unwrap().value, 5_000.0);
    assert_eq!(snap.series.last().unwrap().value, 5_000.0);
    assert_eq!(snap.performance.end_value, 5_000.0);
}

#[test]
fn test_same_external_id_across_institutions() {
    let items = vec![
        item("Chase", vec![raw("acc-0001", "depository", "checking", 100.0)]),
        item("Chase Business", vec![raw("acc-0001", "depository", "checking", 200.0)]),
    ];
    let snap = recompute(&PortfolioEngine::default(), &items, Timeframe::All);

    assert_eq!(snap.accounts.len(), 2);
    assert_ne!(snap.accounts[0].account.id, snap.accounts[1].account.id);
    assert_eq!(snap.accounts[0].account.external_id, snap.accounts[1].account.external_id);
}

// ═══════════════════════════════════════════════════════════════════
// Snapshot shape
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_empty_items_produce_valid_snapshot() {
    let snap = recompute(&PortfolioEngine::default(), &[], Timeframe::OneMonth);

    assert_eq!(snap.summary.total_assets, 0.0);
    assert!(snap.accounts.is_empty());
    assert!(snap.allocation.is_empty());
    assert!(snap.holdings.is_empty());
    assert_eq!(snap.series.len(), 2);
    assert!(snap.series.iter().all(|p| p.value == 0.0));
    assert_eq!(snap.performance.percent_change, 0.0);
}

#[test]
fn test_every_timeframe_ends_at_headline() {
    let items = vec![item(
        "Broker",
        vec![
            raw("b", "investment", "brokerage", 25_000.0),
            raw("c", "credit", "credit card", 1_200.0),
        ],
    )];
    let engine = PortfolioEngine::default();
    for tf in Timeframe::ALL_LABELS {
        let snap = recompute(&engine, &items, tf);
        assert_eq!(snap.timeframe, tf);
        assert_eq!(snap.series.last().unwrap().value, 23_800.0, "{tf}");
    }
}

#[test]
fn test_change_timeframe_keeps_all_time_figures() {
    let items = vec![item("Broker", vec![raw("b", "investment", "ira", 40_000.0)])];
    let engine = PortfolioEngine::default();
    let all = recompute(&engine, &items, Timeframe::All);
    let week = engine.change_timeframe(&all, Timeframe::OneWeek, &mut FixedRandom(0.5));

    assert_eq!(week.timeframe, Timeframe::OneWeek);
    assert_eq!(week.series.len(), 7);
    assert_eq!(week.performance, all.performance);
    assert_eq!(week.history, all.history);
    assert_eq!(week.summary, all.summary);
}

#[test]
fn test_deterministic_parts_are_idempotent() {
    let items = vec![item(
        "Bank",
        vec![
            raw("1", "depository", "savings", 900.0),
            raw("2", "depository", "hsa", 100.0),
        ],
    )];
    let engine = PortfolioEngine::default();
    let a = engine.recompute(&items, Timeframe::All, DataMode::Live);
    let b = engine.recompute(&items, Timeframe::All, DataMode::Live);

    assert_eq!(a.accounts, b.accounts);
    assert_eq!(a.summary, b.summary);
    assert_eq!(a.allocation, b.allocation);
    assert_eq!(a.holdings, b.holdings);
    assert_eq!(a.history.points.last(), b.history.points.last());
}

#[test]
fn test_seeded_recompute_is_reproducible() {
    let items = vec![item("Broker", vec![raw("b", "investment", "brokerage", 12_345.0)])];
    let engine = PortfolioEngine::default();
    let a = recompute(&engine, &items, Timeframe::OneDay);
    let b = recompute(&engine, &items, Timeframe::OneDay);
    assert_eq!(a, b);
}

#[test]
fn test_exclude_policy_from_settings() {
    let engine = PortfolioEngine::from_settings_json(r#"{ "other_accounts_policy": "exclude" }"#)
        .unwrap();
    let items = vec![item(
        "Bank",
        vec![
            raw("1", "depository", "checking", 1_000.0),
            raw("2", "depository", "cd", 5_000.0),
        ],
    )];
    let snap = recompute(&engine, &items, Timeframe::All);

    assert_eq!(engine.settings().other_accounts_policy, OtherAccountsPolicy::Exclude);
    assert_eq!(snap.summary.total_assets, 1_000.0);
    assert_eq!(snap.allocation.len(), 1);
    assert_eq!(snap.accounts.len(), 2);
    assert!(!snap.accounts[1].counted);
}

#[test]
fn test_security_holdings_preferred_over_accounts() {
    let mut broker = item("Broker", vec![raw("b", "investment", "brokerage", 3_000.0)]);
    broker.payload.holdings = Some(vec![RawHolding {
        account_id: "b".into(),
        security_id: "s-aapl".into(),
        institution_value: Some(3_000.0),
        quantity: Some(12.0),
    }]);
    broker.payload.securities = Some(vec![RawSecurity {
        security_id: "s-aapl".into(),
        ticker_symbol: Some("AAPL".into()),
        name: Some("Apple Inc.".into()),
        security_type: Some("equity".into()),
    }]);

    let snap = recompute(&PortfolioEngine::default(), &[broker], Timeframe::All);
    assert_eq!(snap.holdings.len(), 1);
    match &snap.holdings[0] {
        HoldingItem::Security { symbol, logo_url, value, .. } => {
            assert_eq!(symbol, "AAPL");
            assert_eq!(*value, 3_000.0);
            assert_eq!(logo_url, "https://logo.clearbit.com/apple.com");
        }
        other => panic!("expected security, got {other:?}"),
    }
}

#[test]
fn test_custom_holdings_limit_and_history_length() {
    let settings = EngineSettings {
        holdings_limit: 2,
        history_months: 36,
        ..EngineSettings::default()
    };
    let engine = PortfolioEngine::new(settings).unwrap();
    let items = vec![item(
        "Bank",
        vec![
            raw("1", "depository", "checking", 1.0),
            raw("2", "depository", "savings", 2.0),
            raw("3", "depository", "savings", 3.0),
        ],
    )];
    let snap = recompute(&engine, &items, Timeframe::All);
    assert_eq!(snap.holdings.len(), 2);
    assert_eq!(snap.history.points.len(), 36);
}

#[test]
fn test_engine_rejects_invalid_settings() {
    let short_history = EngineSettings {
        history_months: 3,
        ..EngineSettings::default()
    };
    let err = PortfolioEngine::new(short_history).unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(ref m) if m.contains("history_months")));

    let no_holdings = EngineSettings {
        holdings_limit: 0,
        ..EngineSettings::default()
    };
    let err = PortfolioEngine::new(no_holdings).unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(ref m) if m.contains("holdings_limit")));

    let no_palette = EngineSettings {
        palette: Vec::new(),
        ..EngineSettings::default()
    };
    assert!(PortfolioEngine::new(no_palette).is_err());
}

#[test]
fn test_minimum_history_still_yields_full_year() {
    let settings = EngineSettings {
        history_months: 13,
        holdings_limit: 1,
        ..EngineSettings::default()
    };
    let engine = PortfolioEngine::new(settings).unwrap();
    let items = vec![item("Broker", vec![raw("1", "investment", "brokerage", 10_000.0)])];
    let snap = recompute(&engine, &items, Timeframe::OneYear);
    assert_eq!(snap.series.len(), 13);
    assert_eq!(snap.series.last().unwrap().value, 10_000.0);
    assert_eq!(snap.holdings.len(), 1);
}

#[test]
fn test_snapshot_serializes_camel_case() {
    let items = vec![item("Bank", vec![raw("1", "depository", "checking", 10.0)])];
    let snap = recompute(&PortfolioEngine::default(), &items, Timeframe::ThreeMonths);
    let json = serde_json::to_value(&snap).unwrap();

    assert_eq!(json["timeframe"], "3M");
    assert_eq!(json["mode"], "live");
    assert!(json["summary"]["totalAssets"].is_number());
    assert!(json["history"]["useAssetsOnly"].is_boolean());
    assert_eq!(json["series"].as_array().unwrap().len(), 4);
}

// ═══════════════════════════════════════════════════════════════════
// Demo mode
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_demo_mode_ignores_live_items() {
    let live = vec![item("Real Bank", vec![raw("1", "depository", "checking", 1.0)])];
    let snap = PortfolioEngine::default().recompute_with(
        &live,
        Timeframe::All,
        DataMode::Demo,
        as_of(),
        &mut FixedRandom(0.5),
    );

    assert_eq!(snap.mode, DataMode::Demo);
    assert!(snap.accounts.iter().all(|s| s.account.institution_name != "Real Bank"));
    assert_eq!(snap.accounts.len(), 6);
    assert!((snap.summary.total_assets - 89_101.15).abs() < 1e-6);
    assert!((snap.summary.total_liabilities - 23_245.22).abs() < 1e-6);
}

#[test]
fn test_demo_mode_shows_top_positions() {
    let snap = PortfolioEngine::default().recompute_with(
        &[],
        Timeframe::All,
        DataMode::Demo,
        as_of(),
        &mut FixedRandom(0.5),
    );

    let names: Vec<_> = snap.holdings.iter().map(|h| h.name().to_string()).collect();
    assert_eq!(snap.holdings.len(), 5);
    assert!(snap.holdings.iter().all(HoldingItem::is_security));
    assert_eq!(names[0], "Vanguard S&P 500 ETF");
    assert_eq!(snap.allocation[0].category, Category::Investments);
    assert_eq!(snap.allocation[1].category, Category::Assets);
}

// ═══════════════════════════════════════════════════════════════════
// Store-backed recompute
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_recompute_from_memory_store() {
    let store = MemoryItemStore::new();
    store
        .add(item("Bank", vec![raw("1", "depository", "checking", 250.0)]))
        .unwrap();
    store
        .add(item("Card Co", vec![raw("2", "credit", "credit card", 50.0)]))
        .unwrap();

    let snap = PortfolioEngine::default()
        .recompute_from_store(&store, Timeframe::OneYear, DataMode::Live)
        .unwrap();
    assert_eq!(snap.summary.net_worth, 200.0);
    assert_eq!(snap.series.len(), 13);
}

#[test]
fn test_recompute_from_store_in_demo_mode_skips_store() {
    struct FailingStore;

    impl LinkedItemStore for FailingStore {
        fn list(&self) -> Result<Vec<LinkedItem>, CoreError> {
            Err(CoreError::FileIO("unavailable".into()))
        }
        fn add(&self, _item: LinkedItem) -> Result<(), CoreError> {
            Ok(())
        }
        fn remove(&self, id: uuid::Uuid) -> Result<LinkedItem, CoreError> {
            Err(CoreError::ItemNotFound(id.to_string()))
        }
    }

    let engine = PortfolioEngine::default();
    assert!(engine
        .recompute_from_store(&FailingStore, Timeframe::All, DataMode::Live)
        .is_err());
    let snap = engine
        .recompute_from_store(&FailingStore, Timeframe::All, DataMode::Demo)
        .unwrap();
    assert_eq!(snap.mode, DataMode::Demo);
}

// ═══════════════════════════════════════════════════════════════════
// Item refresh through a provider
// ═══════════════════════════════════════════════════════════════════

struct MockProvider {
    accounts: Vec<RawAccount>,
    institution: Option<RawInstitution>,
    holdings: HoldingsResponse,
}

#[async_trait]
impl AccountDataProvider for MockProvider {
    fn name(&self) -> &str {
        "MockProvider"
    }

    async fn fetch_accounts(&self, access_token: &str) -> Result<AccountsResponse, CoreError> {
        if access_token.is_empty() {
            return Err(CoreError::Api {
                provider: "MockProvider".into(),
                message: "INVALID_ACCESS_TOKEN: missing token".into(),
            });
        }
        Ok(AccountsResponse {
            accounts: self.accounts.clone(),
            institution: self.institution.clone(),
        })
    }

    async fn fetch_holdings(&self, _access_token: &str) -> Result<HoldingsResponse, CoreError> {
        Ok(self.holdings.clone())
    }
}

#[tokio::test]
async fn test_refresh_replaces_accounts_and_keeps_identity() {
    let original = item("Old Name Bank", vec![raw("1", "depository", "checking", 10.0)]);
    let provider = MockProvider {
        accounts: vec![
            raw("1", "depository", "checking", 75.0),
            raw("2", "depository", "savings", 25.0),
        ],
        institution: None,
        holdings: HoldingsResponse::default(),
    };

    let refreshed = PortfolioEngine::default()
        .refresh_item(&provider, &original)
        .await
        .unwrap();

    assert_eq!(refreshed.id, original.id);
    assert_eq!(refreshed.access_token, original.access_token);
    assert_eq!(refreshed.payload.accounts.as_ref().unwrap().len(), 2);
    assert_eq!(refreshed.payload.institution, original.payload.institution);
    assert!(refreshed.payload.holdings.is_none());
    assert!(refreshed.payload.securities.is_none());
    // Input untouched
    assert_eq!(original.payload.accounts.as_ref().unwrap().len(), 1);
}

#[tokio::test]
async fn test_refresh_carries_holdings_into_snapshot() {
    let original = item("Broker", vec![]);
    let provider = MockProvider {
        accounts: vec![raw("b", "investment", "brokerage", 500.0)],
        institution: Some(RawInstitution {
            name: Some("Broker Renamed".into()),
            logo: Some("https://cdn.example/broker.png".into()),
            url: None,
        }),
        holdings: HoldingsResponse {
            holdings: vec![RawHolding {
                account_id: "b".into(),
                security_id: "s1".into(),
                institution_value: Some(500.0),
                quantity: Some(5.0),
            }],
            securities: vec![RawSecurity {
                security_id: "s1".into(),
                ticker_symbol: Some("VTI".into()),
                name: Some("Vanguard Total Stock Market ETF".into()),
                security_type: Some("etf".into()),
            }],
        },
    };

    let engine = PortfolioEngine::default();
    let refreshed = engine.refresh_item(&provider, &original).await.unwrap();
    let snap = recompute(&engine, &[refreshed], Timeframe::All);

    assert_eq!(snap.accounts[0].account.institution_name, "Broker Renamed");
    assert_eq!(snap.accounts[0].account.logo_url, "https://cdn.example/broker.png");
    assert!(snap.holdings[0].is_security());
    assert_eq!(snap.holdings[0].name(), "Vanguard Total Stock Market ETF");
}

#[tokio::test]
async fn test_refresh_propagates_provider_error() {
    let mut original = item("Bank", vec![]);
    original.access_token = String::new();
    let provider = MockProvider {
        accounts: vec![],
        institution: None,
        holdings: HoldingsResponse::default(),
    };

    let err = PortfolioEngine::default()
        .refresh_item(&provider, &original)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Api { .. }));
}

#[test]
fn test_aggregator_client_requires_credentials() {
    assert!(PortfolioEngine::default().aggregator_client().is_none());
    let engine = PortfolioEngine::from_settings_json(
        r#"{ "api": { "base_url": "https://sandbox.example", "client_id": "c", "secret": "s" } }"#,
    )
    .unwrap();
    assert!(engine.aggregator_client().is_some());
}
