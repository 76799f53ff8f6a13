//! Pure SerpApi REST client.
//!
//! A minimal client for SerpApi's `search.json` endpoint. Supports Google
//! Shopping searches and Google image searches.
//!
//! # Example
//!
//! ```rust,ignore
//! use serpapi_client::SerpApiClient;
//!
//! let client = SerpApiClient::new("your-api-key".into());
//!
//! let results = client.search_shopping("desk lamp").await?;
//! for result in &results.shopping_results {
//!     println!("{:?} {:?}", result.title, result.price);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{Result, SerpApiError};
pub use types::{ImageResult, ImageSearchResponse, ShoppingResult, ShoppingSearchResponse};

use serde::de::DeserializeOwned;

const BASE_URL: &str = "https://serpapi.com/search.json";

#[derive(Clone)]
pub struct SerpApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SerpApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point at a different endpoint (mock servers, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Google Shopping search for `query`.
    pub async fn search_shopping(&self, query: &str) -> Result<ShoppingSearchResponse> {
        let response: ShoppingSearchResponse = self
            .search(&[("q", query), ("engine", "google_shopping")])
            .await?;

        if let Some(message) = response.error.clone() {
            if response.shopping_results.is_empty() {
                return Err(SerpApiError::Search(message));
            }
        }

        tracing::debug!(
            query,
            count = response.shopping_results.len(),
            "SerpApi shopping search"
        );
        Ok(response)
    }

    /// First page of Google image results for `query`.
    pub async fn search_images(&self, query: &str) -> Result<ImageSearchResponse> {
        let response: ImageSearchResponse = self
            .search(&[("q", query), ("tbm", "isch"), ("ijn", "0")])
            .await?;

        if let Some(message) = response.error.clone() {
            if response.images_results.is_empty() {
                return Err(SerpApiError::Search(message));
            }
        }

        Ok(response)
    }

    async fn search<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SerpApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }
}
