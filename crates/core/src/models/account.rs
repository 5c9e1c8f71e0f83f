use serde::{Deserialize, Serialize};

/// Classification bucket driving aggregation and allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Brokerage, retirement and other market-exposed accounts
    Investments,
    /// Cash-like accounts: checking, savings, money market
    Assets,
    /// Debt: credit cards, loans, mortgages
    Liabilities,
    /// Everything else (HSA, CDs, unknown types)
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Investments,
        Category::Assets,
        Category::Liabilities,
        Category::Other,
    ];

    pub fn is_liability(&self) -> bool {
        matches!(self, Category::Liabilities)
    }

    /// Display label used for allocation buckets.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Investments => "Investments",
            Category::Assets => "Cash & Savings",
            Category::Liabilities => "Liabilities",
            Category::Other => "Other",
        }
    }

    /// Icon name used by account-level holding rows.
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Investments => "trending-up",
            Category::Assets => "wallet",
            Category::Liabilities => "credit-card",
            Category::Other => "circle-dollar",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Investments => write!(f, "investments"),
            Category::Assets => write!(f, "assets"),
            Category::Liabilities => write!(f, "liabilities"),
            Category::Other => write!(f, "other"),
        }
    }
}

/// The canonical account record after type and balance resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAccount {
    /// Unique within one aggregation pass; derived from institution + external id
    pub id: String,

    /// External account id from the aggregation API
    pub external_id: String,

    pub display_name: String,

    pub institution_name: String,

    pub raw_type: String,

    pub raw_subtype: Option<String>,

    /// Signed balance. For liabilities the magnitude is the owed amount.
    pub balance: f64,

    pub category: Category,

    pub logo_url: String,

    /// Last digits of the account number, if reported
    pub mask: Option<String>,

    pub iso_currency_code: Option<String>,
}

impl NormalizedAccount {
    pub fn is_liability(&self) -> bool {
        self.category.is_liability()
    }

    pub fn magnitude(&self) -> f64 {
        self.balance.abs()
    }
}

/// An account together with its share of the (asset-side) portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountShare {
    pub account: NormalizedAccount,

    /// `|balance| / totalAssets × 100`; always 0 for liabilities
    pub percentage_of_total: f64,

    pub is_liability: bool,

    /// False when the account is listed but excluded from totals by policy
    pub counted: bool,
}
