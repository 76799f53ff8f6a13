use serde::{Deserialize, Serialize};

use super::pricing::format_price;
use crate::domains::products::ProductPriceInfo;

/// One shopping-list recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub item: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Display price, filled in by [`ShoppingItem::with_display_price`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl ShoppingItem {
    pub fn new(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            reason: reason.into(),
            price_low: None,
            price_high: None,
            image: None,
            price: None,
        }
    }

    /// Merge lookup data. Only fields the lookup actually found replace
    /// what the model supplied.
    pub fn merge_price_info(&mut self, info: &ProductPriceInfo) {
        if info.price_low.is_some() {
            self.price_low = info.price_low;
        }
        if info.price_high.is_some() {
            self.price_high = info.price_high;
        }
        if info.image.is_some() {
            self.image = info.image.clone();
        }
    }

    /// Display string for the price bounds.
    pub fn display_price(&self, missing_label: &str) -> String {
        format_price(self.price_low, self.price_high, missing_label)
    }

    pub fn with_display_price(mut self, missing_label: &str) -> Self {
        self.price = Some(self.display_price(missing_label));
        self
    }
}

/// An accepted/rejected entry: a bare name or a previously returned item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemRef {
    Name(String),
    Record {
        #[serde(default)]
        item: Option<String>,
    },
}

impl ItemRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name.as_str()),
            Self::Record { item } => item.as_deref(),
        }
    }
}

impl From<&str> for ItemRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<&ShoppingItem> for ItemRef {
    fn from(item: &ShoppingItem) -> Self {
        Self::Record {
            item: Some(item.item.clone()),
        }
    }
}
