//! Fixed illustrative dataset used when demo mode is on.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::linked_item::{
    LinkedItem, RawAccount, RawBalances, RawHolding, RawInstitution, RawLinkPayload, RawSecurity,
};

fn account(
    id: &str,
    name: &str,
    account_type: &str,
    subtype: &str,
    current: f64,
    mask: &str,
) -> RawAccount {
    RawAccount {
        account_id: id.to_string(),
        name: Some(name.to_string()),
        official_name: None,
        account_type: account_type.to_string(),
        subtype: Some(subtype.to_string()),
        balances: RawBalances {
            current: Some(current),
            available: None,
            iso_currency_code: Some("USD".to_string()),
        },
        mask: Some(mask.to_string()),
    }
}

fn holding(account_id: &str, security_id: &str, value: f64, quantity: f64) -> RawHolding {
    RawHolding {
        account_id: account_id.to_string(),
        security_id: security_id.to_string(),
        institution_value: Some(value),
        quantity: Some(quantity),
    }
}

fn security(id: &str, ticker: &str, name: &str, kind: &str) -> RawSecurity {
    RawSecurity {
        security_id: id.to_string(),
        ticker_symbol: Some(ticker.to_string()),
        name: Some(name.to_string()),
        security_type: Some(kind.to_string()),
    }
}

fn item(n: u128, institution: &str, connected_at: DateTime<Utc>, payload: RawLinkPayload) -> LinkedItem {
    LinkedItem {
        id: Uuid::from_u128(n),
        access_token: format!("demo-access-{n}"),
        institution_name: institution.to_string(),
        connected_at,
        payload,
    }
}

/// Demo linked items: a bank, a brokerage with positions, a card issuer
/// and a student loan servicer. Same shape as live items, so it goes through
/// the normal pipeline.
pub fn demo_items(as_of: DateTime<Utc>) -> Vec<LinkedItem> {
    let connected_at = as_of - Duration::days(90);

    let bank = RawLinkPayload {
        accounts: Some(vec![
            account("demo-chk", "Everyday Checking", "depository", "checking", 4_250.75, "0421"),
            account("demo-sav", "High-Yield Savings", "depository", "savings", 18_300.00, "7788"),
        ]),
        institution: Some(RawInstitution {
            name: Some("First Demo Bank".to_string()),
            logo: None,
            url: Some("https://bank.example".to_string()),
        }),
        holdings: None,
        securities: None,
    };

    let brokerage = RawLinkPayload {
        accounts: Some(vec![
            account("demo-brk", "Individual Brokerage", "investment", "brokerage", 42_610.40, "5521"),
            account("demo-ira", "Roth IRA", "investment", "roth", 23_940.00, "9034"),
        ]),
        institution: Some(RawInstitution {
            name: Some("Demo Securities".to_string()),
            logo: None,
            url: None,
        }),
        holdings: Some(vec![
            holding("demo-brk", "sec-voo", 18_420.10, 38.0),
            holding("demo-brk", "sec-aapl", 9_870.30, 42.0),
            holding("demo-brk", "sec-msft", 8_320.00, 19.5),
            holding("demo-ira", "sec-vxus", 12_950.00, 210.0),
            holding("demo-ira", "sec-bnd", 10_990.00, 150.0),
            holding("demo-brk", "sec-cash", 6_000.00, 6_000.0),
        ]),
        securities: Some(vec![
            security("sec-voo", "VOO", "Vanguard S&P 500 ETF", "etf"),
            security("sec-aapl", "AAPL", "Apple Inc.", "equity"),
            security("sec-msft", "MSFT", "Microsoft Corporation", "equity"),
            security("sec-vxus", "VXUS", "Vanguard Total International Stock ETF", "etf"),
            security("sec-bnd", "BND", "Vanguard Total Bond Market ETF", "etf"),
            security("sec-cash", "CUR:USD", "U.S. Dollar", "cash"),
        ]),
    };

    let card = RawLinkPayload {
        accounts: Some(vec![account(
            "demo-cc", "Rewards Card", "credit", "credit card", 1_845.22, "3310",
        )]),
        institution: Some(RawInstitution {
            name: Some("Demo Card Services".to_string()),
            logo: None,
            url: None,
        }),
        holdings: None,
        securities: None,
    };

    let loan = RawLinkPayload {
        accounts: Some(vec![account(
            "demo-stu", "Graduate Loan", "loan", "student", 21_400.00, "6612",
        )]),
        institution: Some(RawInstitution {
            name: Some("Demo Loan Servicing".to_string()),
            logo: None,
            url: None,
        }),
        holdings: None,
        securities: None,
    };

    vec![
        item(1, "First Demo Bank", connected_at, bank),
        item(2, "Demo Securities", connected_at, brokerage),
        item(3, "Demo Card Services", connected_at, card),
        item(4, "Demo Loan Servicing", connected_at, loan),
    ]
}
