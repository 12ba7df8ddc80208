//! Wire shapes of the Product Store and their conversion to [`Product`].
//!
//! Two dialects exist:
//! - `backend`: records wrapped in a `{"data": ...}` envelope, keyed by
//!   `product_id`, with `name`, `stock`, `tags` and `launch_date`.
//! - `fakestore`: bare records with a numeric `id`, `title` and a single
//!   `category`.
//!
//! Nothing outside this module sees either shape.

use serde::{Deserialize, Deserializer, Serialize};
use shopfront_core::{Price, Product, ProductId};

/// Envelope used by the backend dialect.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Product record in the backend dialect.
#[derive(Debug, Serialize, Deserialize)]
pub struct BackendProduct {
    pub product_id: String,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub launch_date: String,
}

/// Product record in the fake-store dialect.
#[derive(Debug, Serialize, Deserialize)]
pub struct FakeStoreProduct {
    #[serde(
        default,
        deserialize_with = "deserialize_loose_id",
        skip_serializing
    )]
    pub id: Option<String>,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
}

/// Login request body (both dialects).
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login response body (both dialects).
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Accept ids sent as numbers or strings.
fn deserialize_loose_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// =============================================================================
// Backend
// =============================================================================

#[must_use]
pub fn convert_backend_product(wire: BackendProduct) -> Product {
    Product {
        id: ProductId::from_store(wire.product_id),
        name: wire.name,
        price: wire.price,
        stock: wire.stock,
        image: wire.image,
        description: wire.description,
        tags: wire.tags,
        launched_at: wire.launch_date,
    }
}

#[must_use]
pub fn backend_product_from(product: &Product) -> BackendProduct {
    BackendProduct {
        product_id: product.id.as_str().to_owned(),
        name: product.name.clone(),
        price: product.price,
        stock: product.stock,
        image: product.image.clone(),
        description: product.description.clone(),
        tags: product.tags.clone(),
        launch_date: product.launched_at.clone(),
    }
}

// =============================================================================
// Fake store
// =============================================================================

/// Convert a fake-store record.
///
/// `fallback_id` is used when the record carries no id (some fake-store
/// responses to PATCH echo the body only).
#[must_use]
pub fn convert_fakestore_product(wire: FakeStoreProduct, fallback_id: Option<&ProductId>) -> Product {
    let id = wire
        .id
        .map(ProductId::from_store)
        .or_else(|| fallback_id.cloned())
        .unwrap_or_else(|| ProductId::from_store(String::new()));
    let tags = if wire.category.trim().is_empty() {
        Vec::new()
    } else {
        vec![wire.category]
    };

    Product {
        id,
        name: wire.title,
        price: wire.price,
        stock: 0,
        image: wire.image,
        description: wire.description,
        tags,
        launched_at: String::new(),
    }
}

#[must_use]
pub fn fakestore_product_from(product: &Product) -> FakeStoreProduct {
    FakeStoreProduct {
        id: None,
        title: product.name.clone(),
        price: product.price,
        description: product.description.clone(),
        category: product.category().unwrap_or_default().to_owned(),
        image: product.image.clone(),
    }
}
