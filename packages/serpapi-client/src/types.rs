use serde::{Deserialize, Serialize};

/// Response of a `google_shopping` search. Only the fields we read are typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShoppingSearchResponse {
    #[serde(default)]
    pub shopping_results: Vec<ShoppingResult>,
    pub error: Option<String>,
}

/// A single shopping result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShoppingResult {
    pub title: Option<String>,
    /// Free text such as "$1,299.99" or "$12.00 used".
    pub price: Option<String>,
    pub extracted_price: Option<f64>,
    pub source: Option<String>,
    pub thumbnail: Option<String>,
    pub original: Option<String>,
    pub link: Option<String>,
    pub product_link: Option<String>,
}

impl ShoppingResult {
    /// Thumbnail if present, otherwise the original image.
    pub fn image(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()
            .or(self.original.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// Response of an image search (`tbm=isch`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageSearchResponse {
    #[serde(default)]
    pub images_results: Vec<ImageResult>,
    pub error: Option<String>,
}

impl ImageSearchResponse {
    /// Full-size URL of the top result. Later results are not consulted.
    pub fn top_original(&self) -> Option<&str> {
        self.images_results
            .first()
            .and_then(|r| r.original.as_deref())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageResult {
    pub title: Option<String>,
    pub original: Option<String>,
    pub thumbnail: Option<String>,
}
