//! Canonical product record.
//!
//! The Product Store speaks more than one JSON dialect; all of them are
//! converted into this one shape at the client boundary.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub stock: u32,
    /// Image URL.
    pub image: String,
    pub description: String,
    /// Ordered tags; the first one doubles as the product's category.
    pub tags: Vec<String>,
    /// Launch timestamp as sent by the store (ISO-8601, may be empty).
    pub launched_at: String,
}

impl Product {
    /// Case-insensitive containment test against the product name.
    #[must_use]
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Case-insensitive exact match against any of the product's tags.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// The first tag, shown as the product's category.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }
}

/// Split a comma-separated tag string into trimmed tags.
///
/// Empty segments are dropped, so `""` yields no tags and `"a,,b"` yields
/// `["a", "b"]`.
#[must_use]
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join tags back into the editable comma-separated form.
#[must_use]
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
