//! Server dependencies for domain activities (using traits for testability)
//!
//! This module provides the central dependency container used by every domain.
//! All external services use trait abstractions to enable testing.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use openai_client::OpenAIClient;
use serpapi_client::SerpApiClient;

use crate::config::Config;
use crate::domains::products::ProductLookup;
use crate::kernel::{
    BaseAI, BaseProductSearch, CachePolicy, NoopProductSearch, OpenAIModel, Prompts,
    SerpApiProductSearch,
};

/// Optional behaviours toggled by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// Merge ProductLookup prices/images into shopping recommendations
    pub enrich_shopping_prices: bool,
    /// Attach ProductLookup images to chat recommendation lists
    pub enrich_recommendation_images: bool,
    /// Offer the hosted web search tool on chat turns
    pub chat_web_search: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            enrich_shopping_prices: true,
            enrich_recommendation_images: true,
            chat_web_search: false,
        }
    }
}

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub ai: Arc<dyn BaseAI>,
    pub products: Arc<ProductLookup>,
    pub prompts: Arc<Prompts>,
    pub features: Features,
}

impl ServerDeps {
    pub fn new(
        ai: Arc<dyn BaseAI>,
        products: Arc<ProductLookup>,
        prompts: Prompts,
        features: Features,
    ) -> Self {
        Self {
            ai,
            products,
            prompts: Arc::new(prompts),
            features,
        }
    }

    /// Wire real providers from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = OpenAIClient::new(config.openai_api_key.clone());
        if let Some(url) = &config.openai_base_url {
            client = client.with_base_url(url.clone());
        }
        let ai: Arc<dyn BaseAI> = Arc::new(OpenAIModel::new(client, config.openai_model.clone()));

        let search: Arc<dyn BaseProductSearch> = match &config.serpapi_key {
            Some(key) => Arc::new(SerpApiProductSearch::new(SerpApiClient::new(key.clone()))),
            None => {
                tracing::warn!("SERPAPI_KEY not set, product lookups will return no data");
                Arc::new(NoopProductSearch)
            }
        };

        let policy = CachePolicy {
            max_entries: config.product_cache_capacity,
            ttl: Duration::from_secs(config.product_cache_ttl_secs),
        };

        let prompts = Prompts::load(config.prompts_dir.as_deref()).context("Failed to load prompts")?;

        Ok(Self::new(
            ai,
            Arc::new(ProductLookup::new(search, policy)),
            prompts,
            Features {
                enrich_shopping_prices: config.enrich_shopping_prices,
                enrich_recommendation_images: config.enrich_recommendation_images,
                chat_web_search: config.chat_web_search,
            },
        ))
    }
}
