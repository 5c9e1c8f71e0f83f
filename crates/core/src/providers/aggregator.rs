use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::{AccountDataProvider, AccountsResponse, HoldingsResponse};
use crate::errors::CoreError;
use crate::models::linked_item::{RawAccount, RawHolding, RawInstitution, RawSecurity};
use crate::models::settings::AggregatorConfig;

const PROVIDER: &str = "Aggregator";

/// Error codes meaning "this item has no investment positions", not a failure.
const NO_HOLDINGS_CODES: &[&str] = &["PRODUCTS_NOT_SUPPORTED", "NO_INVESTMENT_ACCOUNTS"];

/// Client for the account aggregation API.
///
/// - **Auth**: `client_id` + `secret` in every request body, plus the item's access token
/// - **Endpoints**: `/accounts/balance/get`, `/investments/holdings/get`
pub struct AggregatorClient {
    client: Client,
    config: AggregatorConfig,
}

impl AggregatorClient {
    pub fn new(config: AggregatorConfig) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        access_token: &str,
    ) -> Result<Result<T, ApiErrorBody>, CoreError> {
        let body = RequestBody {
            client_id: &self.config.client_id,
            secret: &self.config.secret,
            access_token,
        };
        let resp = self.client.post(self.url(path)).json(&body).send().await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await.map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse {path} response: {e}"),
            })?;
            return Ok(Ok(parsed));
        }

        let text = resp.text().await.unwrap_or_default();
        let error = serde_json::from_str::<ApiErrorBody>(&text).unwrap_or_else(|_| ApiErrorBody {
            error_code: None,
            error_message: if text.is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {text}")
            },
        });
        Ok(Err(error))
    }
}

// ── Aggregation API wire types ──────────────────────────────────────

#[derive(Serialize)]
struct RequestBody<'a> {
    client_id: &'a str,
    secret: &'a str,
    access_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_message: String,
}

impl ApiErrorBody {
    fn into_core_error(self) -> CoreError {
        let message = match self.error_code {
            Some(code) => format!("{code}: {}", self.error_message),
            None => self.error_message,
        };
        CoreError::Api {
            provider: PROVIDER.into(),
            message,
        }
    }
}

#[derive(Deserialize)]
struct AccountsBody {
    #[serde(default)]
    accounts: Vec<RawAccount>,
    #[serde(default)]
    institution: Option<RawInstitution>,
}

#[derive(Deserialize)]
struct HoldingsBody {
    #[serde(default)]
    holdings: Vec<RawHolding>,
    #[serde(default)]
    securities: Vec<RawSecurity>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AccountDataProvider for AggregatorClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_accounts(&self, access_token: &str) -> Result<AccountsResponse, CoreError> {
        match self.post::<AccountsBody>("accounts/balance/get", access_token).await? {
            Ok(body) => {
                debug!(accounts = body.accounts.len(), "fetched accounts");
                Ok(AccountsResponse {
                    accounts: body.accounts,
                    institution: body.institution,
                })
            }
            Err(error) => {
                warn!(message = %error.error_message, "accounts request failed");
                Err(error.into_core_error())
            }
        }
    }

    async fn fetch_holdings(&self, access_token: &str) -> Result<HoldingsResponse, CoreError> {
        match self.post::<HoldingsBody>("investments/holdings/get", access_token).await? {
            Ok(body) => Ok(HoldingsResponse {
                holdings: body.holdings,
                securities: body.securities,
            }),
            Err(error)
                if error
                    .error_code
                    .as_deref()
                    .is_some_and(|c| NO_HOLDINGS_CODES.contains(&c)) =>
            {
                debug!("item exposes no investment holdings");
                Ok(HoldingsResponse::default())
            }
            Err(error) => {
                warn!(message = %error.error_message, "holdings request failed");
                Err(error.into_core_error())
            }
        }
    }
}
