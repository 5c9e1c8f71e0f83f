use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const DEFAULT_PALETTE: [&str; 6] = [
    "#6366F1", "#22C55E", "#F59E0B", "#EC4899", "#14B8A6", "#8B5CF6",
];

pub const GENERIC_INSTITUTION_LOGO: &str = "/images/institution-generic.svg";
pub const GENERIC_SECURITY_LOGO: &str = "/images/security-generic.svg";

/// How accounts in the residual `other` category are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherAccountsPolicy {
    /// Unknown account types are usually non-debt, so count them as assets
    CountAsAssets,
    /// List them, but keep them out of totals, allocation and holdings
    Exclude,
}

/// Connection details for the account aggregation API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    pub base_url: String,
    pub client_id: String,
    pub secret: String,
}

/// Engine settings. Loaded from JSON by the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub other_accounts_policy: OtherAccountsPolicy,

    /// Maximum rows in the holdings panel
    pub holdings_limit: usize,

    /// Length of the synthesized monthly history
    pub history_months: usize,

    /// Allocation colors, cycled in first-seen category order
    pub palette: Vec<String>,

    pub generic_institution_logo: String,

    pub generic_security_logo: String,

    pub api: Option<AggregatorConfig>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            other_accounts_policy: OtherAccountsPolicy::CountAsAssets,
            holdings_limit: 5,
            history_months: 24,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            generic_institution_logo: GENERIC_INSTITUTION_LOGO.to_string(),
            generic_security_logo: GENERIC_SECURITY_LOGO.to_string(),
            api: None,
        }
    }
}

impl EngineSettings {
    /// Parse and validate settings from a JSON document.
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.holdings_limit == 0 {
            return Err(CoreError::ValidationError(
                "holdings_limit must be at least 1".into(),
            ));
        }
        // 1Y needs 13 monthly points
        if self.history_months < 13 {
            return Err(CoreError::ValidationError(format!(
                "history_months must be at least 13, got {}",
                self.history_months
            )));
        }
        if self.palette.is_empty() {
            return Err(CoreError::ValidationError(
                "palette must contain at least one color".into(),
            ));
        }
        Ok(())
    }
}
