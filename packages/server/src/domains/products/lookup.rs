//! ProductLookup: price bounds and an image for a free-text product query.
//!
//! Lookups never fail. Transport and provider errors produce an all-null
//! [`ProductPriceInfo`]; successful lookups are memoized by exact query string.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serpapi_client::ShoppingResult;
use tracing::{debug, warn};

use super::models::ProductPriceInfo;
use crate::kernel::{BaseProductSearch, CachePolicy, MemoCache};

/// How many top shopping results are considered.
pub const TOP_RESULTS: usize = 5;

lazy_static! {
    static ref PRICE_RE: Regex = Regex::new(r"\$(\d+\.\d{2})").expect("price regex is valid");
}

pub struct ProductLookup {
    search: Arc<dyn BaseProductSearch>,
    cache: MemoCache<ProductPriceInfo>,
    image_fallback: bool,
}

impl ProductLookup {
    pub fn new(search: Arc<dyn BaseProductSearch>, policy: CachePolicy) -> Self {
        Self {
            search,
            cache: MemoCache::new(policy),
            image_fallback: true,
        }
    }

    /// Disable the image-search fallback used when no shopping result has an image.
    pub fn without_image_fallback(mut self) -> Self {
        self.image_fallback = false;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.search.is_enabled()
    }

    /// Look up `query`, serving repeats from the cache.
    pub async fn lookup(&self, query: &str) -> ProductPriceInfo {
        if let Some(hit) = self.cache.get(query) {
            debug!(query, "Product lookup served from cache");
            return hit;
        }

        let results = match self.search.search_shopping(query).await {
            Ok(results) => results,
            Err(e) => {
                warn!(query, error = %e, "Product search failed");
                return ProductPriceInfo::default();
            }
        };

        let mut info = summarize_results(&results);

        if info.image.is_none() && self.image_fallback && self.search.is_enabled() {
            match self.search.search_image(query).await {
                Ok(image) => info.image = image,
                Err(e) => warn!(query, error = %e, "Image search failed"),
            }
        }

        debug!(
            query,
            price_low = ?info.price_low,
            price_high = ?info.price_high,
            has_image = info.image.is_some(),
            "Product lookup"
        );

        self.cache.insert(query, info.clone());
        info
    }
}

/// Price bounds and first image across the top [`TOP_RESULTS`] results.
pub fn summarize_results(results: &[ShoppingResult]) -> ProductPriceInfo {
    let top = &results[..results.len().min(TOP_RESULTS)];

    let prices: Vec<f64> = top
        .iter()
        .filter_map(|r| r.price.as_deref())
        .flat_map(extract_prices)
        .collect();

    ProductPriceInfo {
        price_low: prices.iter().copied().reduce(f64::min),
        price_high: prices.iter().copied().reduce(f64::max),
        image: top.iter().find_map(|r| r.image()).map(str::to_string),
    }
}

/// Every `$d+.dd` amount in a free-text price, commas ignored.
pub fn extract_prices(text: &str) -> Vec<f64> {
    let cleaned = text.replace(',', "");
    PRICE_RE
        .captures_iter(&cleaned)
        .filter_map(|c| c[1].parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockProductSearch;

    fn result(price: Option<&str>, thumbnail: Option<&str>) -> ShoppingResult {
        ShoppingResult {
            price: price.map(str::to_string),
            thumbnail: thumbnail.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_prices() {
        assert_eq!(extract_prices("$1,299.99"), vec![1299.99]);
        assert_eq!(extract_prices("$10.00 - $25.50"), vec![10.0, 25.5]);
        assert!(extract_prices("$25").is_empty());
        assert!(extract_prices("Free").is_empty());
    }

    #[test]
    fn test_summarize_only_reads_top_five() {
        let mut results: Vec<ShoppingResult> = (1..=5)
            .map(|i| result(Some(&format!("${}.00", i * 10)), None))
            .collect();
        results.push(result(Some("$1.00"), Some("https://img/late.jpg")));

        let info = summarize_results(&results);
        assert_eq!(info.price_low, Some(10.0));
        assert_eq!(info.price_high, Some(50.0));
        assert_eq!(info.image, None);
    }

    #[test]
    fn test_summarize_first_image_and_empty() {
        let results = vec![
            result(Some("$9.99"), None),
            result(None, Some("https://img/a.jpg")),
            result(None, Some("https://img/b.jpg")),
        ];
        let info = summarize_results(&results);
        assert_eq!(info.price_low, Some(9.99));
        assert_eq!(info.price_high, Some(9.99));
        assert_eq!(info.image.as_deref(), Some("https://img/a.jpg"));

        assert!(summarize_results(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_repeat_query_uses_cache() {
        let search = Arc::new(
            MockProductSearch::new()
                .with_results("desk lamp", vec![result(Some("$24.99"), Some("https://img/lamp.jpg"))]),
        );
        let lookup = ProductLookup::new(search.clone(), CachePolicy::default());

        let first = lookup.lookup("desk lamp").await;
        let second = lookup.lookup("desk lamp").await;

        assert_eq!(first, second);
        assert_eq!(first.price_low, Some(24.99));
        assert_eq!(search.shopping_call_count("desk lamp"), 1);
    }

    #[tokio::test]
    async fn test_failure_is_all_null_and_not_cached() {
        let search = Arc::new(MockProductSearch::new().failing());
        let lookup = ProductLookup::new(search.clone(), CachePolicy::default());

        assert!(lookup.lookup("desk lamp").await.is_empty());
        assert!(lookup.lookup("desk lamp").await.is_empty());
        assert_eq!(search.shopping_call_count("desk lamp"), 2);
    }

    #[tokio::test]
    async fn test_image_fallback() {
        let search = Arc::new(
            MockProductSearch::new()
                .with_results("pen", vec![result(Some("$1.50"), None)])
                .with_image("pen", "https://img/pen.jpg"),
        );
        let lookup = ProductLookup::new(search.clone(), CachePolicy::default());
        assert_eq!(lookup.lookup("pen").await.image.as_deref(), Some("https://img/pen.jpg"));

        let no_fallback =
            ProductLookup::new(search.clone(), CachePolicy::default()).without_image_fallback();
        assert_eq!(no_fallback.lookup("pen").await.image, None);
    }
}
