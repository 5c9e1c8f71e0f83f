use serde::{Deserialize, Serialize};

use super::account::Category;

/// A displayed top position: either a real security or,
/// when no position detail exists, an account balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HoldingItem {
    #[serde(rename_all = "camelCase")]
    Security {
        symbol: String,
        name: String,
        value: f64,
        logo_url: String,
    },
    #[serde(rename_all = "camelCase")]
    Account {
        account_ref: String,
        name: String,
        value: f64,
        category: Category,
        icon: String,
    },
}

impl HoldingItem {
    pub fn is_security(&self) -> bool {
        matches!(self, HoldingItem::Security { .. })
    }

    pub fn name(&self) -> &str {
        match self {
            HoldingItem::Security { name, .. } | HoldingItem::Account { name, .. } => name,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            HoldingItem::Security { value, .. } | HoldingItem::Account { value, .. } => *value,
        }
    }
}

/// A security position resolved from raw holdings + securities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityPosition {
    pub symbol: Option<String>,
    pub name: String,
    pub market_value: f64,
}
