use crate::models::account::Category;

/// A single classification rule: a lowercase keyword and the category it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub keyword: &'static str,
    pub category: Category,
}

const fn rule(keyword: &'static str, category: Category) -> CategoryRule {
    CategoryRule { keyword, category }
}

/// Ordered keyword rules. The first rule whose keyword occurs anywhere in the
/// account's type or subtype wins, so liability keywords come first: an account
/// that mentions both "loan" and "savings" must never count as an asset.
pub const RULES: &[CategoryRule] = &[
    rule("credit", Category::Liabilities),
    rule("loan", Category::Liabilities),
    rule("mortgage", Category::Liabilities),
    rule("student", Category::Liabilities),
    rule("auto", Category::Liabilities),
    rule("personal", Category::Liabilities),
    rule("investment", Category::Investments),
    rule("brokerage", Category::Investments),
    rule("401k", Category::Investments),
    rule("retirement", Category::Investments),
    rule("ira", Category::Investments),
    rule("saving", Category::Assets),
    rule("checking", Category::Assets),
    rule("cash", Category::Assets),
    rule("money market", Category::Assets),
    rule("hsa", Category::Other),
    rule("cd", Category::Other),
    rule("certificate", Category::Other),
];

/// Keyword-rule account classifier.
///
/// Pure function of `(raw_type, raw_subtype)`; anything no rule matches is `Other`.
pub struct CategoryService {
    rules: &'static [CategoryRule],
}

impl CategoryService {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    pub fn rules(&self) -> &'static [CategoryRule] {
        self.rules
    }

    pub fn classify(&self, raw_type: &str, raw_subtype: Option<&str>) -> Category {
        self.matching_rule(raw_type, raw_subtype)
            .map(|r| r.category)
            .unwrap_or(Category::Other)
    }

    /// The rule that decided the category, if any.
    pub fn matching_rule(&self, raw_type: &str, raw_subtype: Option<&str>) -> Option<&CategoryRule> {
        let haystack = format!("{} {}", raw_type, raw_subtype.unwrap_or("")).to_lowercase();
        self.rules.iter().find(|r| haystack.contains(r.keyword))
    }
}

impl Default for CategoryService {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify with the default rule table.
pub fn classify(raw_type: &str, raw_subtype: Option<&str>) -> Category {
    CategoryService::new().classify(raw_type, raw_subtype)
}
