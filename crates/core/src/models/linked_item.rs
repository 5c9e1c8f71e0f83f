use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One external institution connection.
///
/// Holds the opaque access credential returned by the account-linking flow
/// together with the raw accounts payload captured at connect (or refresh) time.
/// The analytics pipeline only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedItem {
    /// Store key
    pub id: Uuid,

    /// Opaque credential for the aggregation API. Never logged.
    pub access_token: String,

    /// Institution name as reported by the linking flow
    pub institution_name: String,

    /// When the connection was made
    pub connected_at: DateTime<Utc>,

    /// Raw accounts (and optional holdings) returned by the aggregation API
    pub payload: RawLinkPayload,
}

impl LinkedItem {
    pub fn new(
        access_token: impl Into<String>,
        institution_name: impl Into<String>,
        payload: RawLinkPayload,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            access_token: access_token.into(),
            institution_name: institution_name.into(),
            connected_at: Utc::now(),
            payload,
        }
    }

    /// Copy of this item with its payload replaced (used after a refresh).
    pub fn with_payload(&self, payload: RawLinkPayload) -> Self {
        Self {
            payload,
            ..self.clone()
        }
    }
}

/// Payload shape of the aggregation API for a single linked item.
///
/// Every field is optional: an item without an `accounts` array simply
/// contributes zero accounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLinkPayload {
    #[serde(default)]
    pub accounts: Option<Vec<RawAccount>>,

    #[serde(default)]
    pub institution: Option<RawInstitution>,

    /// Position-level detail, present only for investment items that expose it
    #[serde(default)]
    pub holdings: Option<Vec<RawHolding>>,

    #[serde(default)]
    pub securities: Option<Vec<RawSecurity>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInstitution {
    #[serde(default)]
    pub name: Option<String>,

    /// Either an absolute URL or a base64-encoded PNG
    #[serde(default)]
    pub logo: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAccount {
    pub account_id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub official_name: Option<String>,

    #[serde(rename = "type", default)]
    pub account_type: String,

    #[serde(default)]
    pub subtype: Option<String>,

    #[serde(default)]
    pub balances: RawBalances,

    #[serde(default)]
    pub mask: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBalances {
    #[serde(default)]
    pub current: Option<f64>,

    #[serde(default)]
    pub available: Option<f64>,

    #[serde(default)]
    pub iso_currency_code: Option<String>,
}

/// A single position inside an investment account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHolding {
    pub account_id: String,

    pub security_id: String,

    /// Market value of the position as reported by the institution
    #[serde(default)]
    pub institution_value: Option<f64>,

    #[serde(default)]
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSecurity {
    pub security_id: String,

    #[serde(default)]
    pub ticker_symbol: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type", default)]
    pub security_type: Option<String>,
}
