use crate::models::account::{Category, NormalizedAccount};
use crate::models::allocation::AllocationBucket;
use crate::services::analytics_service::AnalyticsService;

/// Groups counted asset-side accounts into colored allocation buckets.
pub struct AllocationService {
    palette: Vec<String>,
}

impl AllocationService {
    pub fn new(palette: Vec<String>) -> Self {
        Self { palette }
    }

    /// Buckets sorted by value, largest first.
    ///
    /// Colors follow first-seen category order, cycling the palette. When
    /// `total_assets` is 0 the buckets are still returned with value 0 so the
    /// chart has something valid to draw.
    pub fn bucketize(
        &self,
        accounts: &[NormalizedAccount],
        total_assets: f64,
        analytics: &AnalyticsService,
    ) -> Vec<AllocationBucket> {
        let mut buckets: Vec<AllocationBucket> = Vec::new();

        for account in accounts.iter().filter(|a| analytics.is_counted_asset(a)) {
            let idx = match buckets.iter().position(|b| b.category == account.category) {
                Some(idx) => idx,
                None => {
                    buckets.push(self.empty_bucket(account.category, buckets.len()));
                    buckets.len() - 1
                }
            };
            let bucket = &mut buckets[idx];
            bucket.value += account.magnitude();
            bucket.member_account_ids.push(account.id.clone());
        }

        for bucket in &mut buckets {
            bucket.percentage_of_total = if total_assets > 0.0 {
                (bucket.value / total_assets) * 100.0
            } else {
                0.0
            };
        }

        buckets.sort_by(|a, b| b.value.total_cmp(&a.value));
        buckets
    }

    fn empty_bucket(&self, category: Category, seen: usize) -> AllocationBucket {
        let color = if self.palette.is_empty() {
            String::new()
        } else {
            self.palette[seen % self.palette.len()].clone()
        };
        AllocationBucket {
            label: category.label().to_string(),
            category,
            value: 0.0,
            percentage_of_total: 0.0,
            color,
            member_account_ids: Vec::new(),
        }
    }
}
