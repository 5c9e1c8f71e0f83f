use std::collections::HashSet;

use tracing::debug;

use crate::models::account::NormalizedAccount;
use crate::models::linked_item::{LinkedItem, RawAccount, RawInstitution};
use crate::services::category_service::CategoryService;

const UNKNOWN_INSTITUTION: &str = "Unknown Institution";

/// Turns raw linked-item payloads into a flat list of [`NormalizedAccount`]s.
///
/// Never fails: absent balances resolve to 0, absent branding to the generic
/// logo, items without an accounts array contribute nothing.
pub struct NormalizerService {
    category_service: CategoryService,
    generic_logo: String,
}

impl NormalizerService {
    pub fn new(generic_logo: impl Into<String>) -> Self {
        Self {
            category_service: CategoryService::new(),
            generic_logo: generic_logo.into(),
        }
    }

    /// Normalize every account of every item, preserving input order.
    ///
    /// Ids are unique within the returned list: if two accounts resolve to the
    /// same institution/account-id pair, later ones get a numeric suffix.
    pub fn normalize_items(&self, items: &[LinkedItem]) -> Vec<NormalizedAccount> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut accounts = Vec::new();

        for item in items {
            let Some(raw_accounts) = item.payload.accounts.as_ref() else {
                debug!(item = %item.id, "linked item has no accounts array, skipping");
                continue;
            };

            let institution = self.institution_name(item);
            let logo_url = self.logo_url(item.payload.institution.as_ref(), &institution);

            for raw in raw_accounts {
                let mut account = self.normalize_account(raw, &institution, &logo_url);
                account.id = Self::unique_id(&mut seen, account.id);
                accounts.push(account);
            }
        }

        accounts
    }

    /// Normalize a single raw account.
    pub fn normalize_account(
        &self,
        raw: &RawAccount,
        institution_name: &str,
        logo_url: &str,
    ) -> NormalizedAccount {
        let subtype = raw.subtype.as_deref().filter(|s| !s.trim().is_empty());
        let category = self.category_service.classify(&raw.account_type, subtype);

        NormalizedAccount {
            id: account_id(institution_name, &raw.account_id),
            external_id: raw.account_id.clone(),
            display_name: display_name(raw),
            institution_name: institution_name.to_string(),
            raw_type: raw.account_type.clone(),
            raw_subtype: subtype.map(str::to_string),
            balance: resolve_balance(raw),
            category,
            logo_url: logo_url.to_string(),
            mask: raw.mask.clone(),
            iso_currency_code: raw.balances.iso_currency_code.clone(),
        }
    }

    fn institution_name(&self, item: &LinkedItem) -> String {
        let reported = item.payload.institution.as_ref().and_then(|i| i.name.as_deref());
        [reported, Some(item.institution_name.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_INSTITUTION)
            .to_string()
    }

    fn logo_url(&self, institution: Option<&RawInstitution>, name: &str) -> String {
        match institution.and_then(|i| i.logo.as_deref()).map(str::trim) {
            Some(logo) if logo.starts_with("http") || logo.starts_with("data:") => {
                logo.to_string()
            }
            Some(logo) if !logo.is_empty() => format!("data:image/png;base64,{logo}"),
            _ => {
                debug!(institution = name, "no institution branding, using generic logo");
                self.generic_logo.clone()
            }
        }
    }

    fn unique_id(seen: &mut HashSet<String>, id: String) -> String {
        if seen.insert(id.clone()) {
            return id;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{id}-{n}");
            if seen.insert(candidate.clone()) {
                debug!(id = %id, resolved = %candidate, "duplicate account id within pass");
                return candidate;
            }
            n += 1;
        }
    }
}

/// Deterministic account id: institution slug + external account id.
pub fn account_id(institution_name: &str, external_id: &str) -> String {
    let slug: String = institution_name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    format!("{slug}:{external_id}")
}

/// `current`, else `available`, else 0. Non-finite values count as missing.
pub fn resolve_balance(raw: &RawAccount) -> f64 {
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    match finite(raw.balances.current).or(finite(raw.balances.available)) {
        Some(v) => v,
        None => {
            debug!(account = %raw.account_id, "no usable balance, defaulting to 0");
            0.0
        }
    }
}

fn display_name(raw: &RawAccount) -> String {
    let non_empty = |s: &Option<String>| {
        s.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    non_empty(&raw.name)
        .or_else(|| non_empty(&raw.official_name))
        .or_else(|| non_empty(&raw.mask).map(|m| format!("Account ending in {m}")))
        .unwrap_or_else(|| "Unnamed account".to_string())
}
