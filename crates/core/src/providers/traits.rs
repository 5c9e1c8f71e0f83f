use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::linked_item::{RawAccount, RawHolding, RawInstitution, RawSecurity};

/// Accounts for one linked item as returned by the aggregation API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountsResponse {
    pub accounts: Vec<RawAccount>,
    pub institution: Option<RawInstitution>,
}

/// Position-level detail for one linked item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingsResponse {
    pub holdings: Vec<RawHolding>,
    pub securities: Vec<RawSecurity>,
}

/// Source of raw linked-account data.
///
/// The analytics pipeline never calls this; the host refreshes items
/// through it before recomputing.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AccountDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Current accounts and balances behind an access token.
    async fn fetch_accounts(&self, access_token: &str) -> Result<AccountsResponse, CoreError>;

    /// Security holdings behind an access token. Items that don't expose
    /// positions return an empty response, not an error.
    async fn fetch_holdings(&self, access_token: &str) -> Result<HoldingsResponse, CoreError>;
}
