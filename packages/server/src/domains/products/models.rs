use serde::{Deserialize, Serialize};

/// Price bounds and a representative image for a product query.
///
/// Every field is nullable; a failed lookup is all-null rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPriceInfo {
    pub price_low: Option<f64>,
    pub price_high: Option<f64>,
    pub image: Option<String>,
}

impl ProductPriceInfo {
    pub fn is_empty(&self) -> bool {
        self.price_low.is_none() && self.price_high.is_none() && self.image.is_none()
    }
}
