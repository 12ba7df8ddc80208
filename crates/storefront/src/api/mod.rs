//! Product Store REST client.
//!
//! # Architecture
//!
//! - Uses `reqwest` 0.13 with JSON bodies
//! - The Product Store is the source of truth; nothing is cached here
//! - No retries, no explicit timeout: failures surface as [`ApiError`]
//!
//! # Endpoints
//!
//! | Operation | `backend` | `fakestore` |
//! |-----------|-----------|-------------|
//! | list      | `GET api/products` | `GET products` |
//! | create    | `POST api/products` | `POST products` |
//! | update    | `PATCH api/products/{id}` | `PATCH products/{id}` |
//! | delete    | `DELETE api/products/{id}` | `DELETE products/{id}` |
//! | login     | `POST api/auth/login` | `POST auth/login` |
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront::api::ProductStoreClient;
//!
//! let client = ProductStoreClient::new(&config.api);
//! let products = client.list_products(None).await?;
//! ```

mod conversions;

use std::str::FromStr;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use shopfront_core::{Product, ProductId};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ProductStoreConfig;

use conversions::{
    BackendProduct, Envelope, FakeStoreProduct, LoginRequest, LoginResponse,
    backend_product_from, convert_backend_product, convert_fakestore_product,
    fakestore_product_from,
};

/// Longest slice of a response body kept in errors and logs.
const MAX_ERROR_BODY: usize = 200;

/// Errors that can occur when talking to the Product Store.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, TLS, body read...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("Product Store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// JSON dialect spoken by the Product Store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiSchema {
    /// The project's own backend (`{"data": ...}` envelopes).
    #[default]
    Backend,
    /// The public fake-store API (bare records, `title`/`category`).
    FakeStore,
}

impl ApiSchema {
    const fn products_path(self) -> &'static [&'static str] {
        match self {
            Self::Backend => &["api", "products"],
            Self::FakeStore => &["products"],
        }
    }

    const fn login_path(self) -> &'static [&'static str] {
        match self {
            Self::Backend => &["api", "auth", "login"],
            Self::FakeStore => &["auth", "login"],
        }
    }
}

impl std::fmt::Display for ApiSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend => write!(f, "backend"),
            Self::FakeStore => write!(f, "fakestore"),
        }
    }
}

impl FromStr for ApiSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backend" => Ok(Self::Backend),
            "fakestore" | "fake-store" => Ok(Self::FakeStore),
            other => Err(format!("unknown API schema {other:?} (expected backend or fakestore)")),
        }
    }
}

// =============================================================================
// ProductStoreClient
// =============================================================================

/// Client for the Product Store REST API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ProductStoreClient {
    inner: Arc<ProductStoreClientInner>,
}

struct ProductStoreClientInner {
    client: reqwest::Client,
    base_url: Url,
    schema: ApiSchema,
    bearer_auth: bool,
}

impl ProductStoreClient {
    /// Create a new Product Store client.
    #[must_use]
    pub fn new(config: &ProductStoreConfig) -> Self {
        Self {
            inner: Arc::new(ProductStoreClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                schema: config.schema,
                bearer_auth: config.bearer_auth,
            }),
        }
    }

    /// The dialect this client speaks.
    #[must_use]
    pub fn schema(&self) -> ApiSchema {
        self.inner.schema
    }

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the store answers with a
    /// non-success status, or the body cannot be parsed.
    #[instrument(skip(self, token), fields(schema = %self.inner.schema))]
    pub async fn list_products(&self, token: Option<&SecretString>) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(&[])?;
        let body = self.send(self.authorize(self.inner.client.get(url), token)).await?;

        let products: Vec<Product> = match self.inner.schema {
            ApiSchema::Backend => decode::<Envelope<Vec<BackendProduct>>>(&body)?
                .data
                .into_iter()
                .map(convert_backend_product)
                .collect(),
            ApiSchema::FakeStore => decode::<Vec<FakeStoreProduct>>(&body)?
                .into_iter()
                .map(|p| convert_fakestore_product(p, None))
                .collect(),
        };

        tracing::debug!(count = products.len(), "Fetched product list");
        Ok(products)
    }

    /// Create a product and return the record as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the store rejects it.
    #[instrument(skip(self, product, token), fields(product_id = %product.id))]
    pub async fn create_product(
        &self,
        product: &Product,
        token: Option<&SecretString>,
    ) -> Result<Product, ApiError> {
        let url = self.endpoint(&[])?;
        let request = match self.inner.schema {
            ApiSchema::Backend => self.inner.client.post(url).json(&backend_product_from(product)),
            ApiSchema::FakeStore => self.inner.client.post(url).json(&fakestore_product_from(product)),
        };
        let body = self.send(self.authorize(request, token)).await?;
        self.decode_record(&body, &product.id)
    }

    /// Partially update the product identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the store rejects it.
    #[instrument(skip(self, product, token), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        product: &Product,
        token: Option<&SecretString>,
    ) -> Result<Product, ApiError> {
        let url = self.endpoint(&[id.as_str()])?;
        let request = match self.inner.schema {
            ApiSchema::Backend => self.inner.client.patch(url).json(&backend_product_from(product)),
            ApiSchema::FakeStore => self.inner.client.patch(url).json(&fakestore_product_from(product)),
        };
        let body = self.send(self.authorize(request, token)).await?;
        self.decode_record(&body, id)
    }

    /// Delete the product identified by `id`. Any response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the store rejects it.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId, token: Option<&SecretString>) -> Result<(), ApiError> {
        let url = self.endpoint(&[id.as_str()])?;
        self.send(self.authorize(self.inner.client.delete(url), token))
            .await?;
        Ok(())
    }

    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are refused.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<SecretString, ApiError> {
        let url = self.url_for(self.inner.schema.login_path(), &[])?;
        let request = self
            .inner
            .client
            .post(url)
            .json(&LoginRequest { username, password });
        let body = self.send(request).await?;
        let response: LoginResponse = decode(&body)?;
        Ok(SecretString::from(response.token))
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Products collection URL, optionally extended with more segments.
    fn endpoint(&self, extra: &[&str]) -> Result<Url, ApiError> {
        self.url_for(self.inner.schema.products_path(), extra)
    }

    fn url_for(&self, path: &[&str], extra: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(path)
            .extend(extra);
        Ok(url)
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&SecretString>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) if self.inner.bearer_auth => request.bearer_auth(token.expose_secret()),
            _ => request,
        }
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let body = truncate(&response_text);
            tracing::error!(
                status = %status,
                body = %body,
                "Product Store returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response_text)
    }

    /// Decode a single product record in the configured dialect.
    fn decode_record(&self, body: &str, fallback_id: &ProductId) -> Result<Product, ApiError> {
        Ok(match self.inner.schema {
            ApiSchema::Backend => convert_backend_product(decode::<Envelope<BackendProduct>>(body)?.data),
            ApiSchema::FakeStore => {
                convert_fakestore_product(decode::<FakeStoreProduct>(body)?, Some(fallback_id))
            }
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %truncate(body),
            "Failed to parse Product Store response"
        );
        ApiError::Parse(e)
    })
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY).collect()
}
