use anyhow::{Context, Result};
use async_trait::async_trait;
use serpapi_client::{SerpApiClient, ShoppingResult};

use super::BaseProductSearch;

/// SerpApi-backed product search
pub struct SerpApiProductSearch {
    client: SerpApiClient,
}

impl SerpApiProductSearch {
    pub fn new(client: SerpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BaseProductSearch for SerpApiProductSearch {
    async fn search_shopping(&self, query: &str) -> Result<Vec<ShoppingResult>> {
        let response = self
            .client
            .search_shopping(query)
            .await
            .context("SerpApi shopping search failed")?;

        Ok(response.shopping_results)
    }

    async fn search_image(&self, query: &str) -> Result<Option<String>> {
        let response = self
            .client
            .search_images(query)
            .await
            .context("SerpApi image search failed")?;

        Ok(response.top_original().map(str::to_string))
    }
}

/// No-op product search for when SERPAPI_KEY is not configured
pub struct NoopProductSearch;

#[async_trait]
impl BaseProductSearch for NoopProductSearch {
    async fn search_shopping(&self, _query: &str) -> Result<Vec<ShoppingResult>> {
        tracing::debug!("NoopProductSearch: search called but no SerpApi key configured");
        Ok(vec![])
    }

    async fn search_image(&self, _query: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
