//! Integration tests for Shopfront.
//!
//! The tests drive the real `shopfront` library, including its `reqwest`
//! client, against [`FakeProductStore`]: an in-process axum server bound to
//! an ephemeral port that speaks either Product Store dialect.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Catalog loading, search and tag filters
//! - `cart_session` - Login, logout and the persistent cart
//! - `admin_editor` - Create, edit and delete through the editor

use std::path::Path;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path as UrlPath, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use shopfront::api::ApiSchema;
use shopfront::config::{ProductStoreConfig, StorefrontConfig};
use shopfront_core::{Price, Product, ProductId};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use url::Url;

/// Password the fake store accepts for any username.
pub const PASSWORD: &str = "secret";

/// A Product Store running on `127.0.0.1` for the duration of a test.
pub struct FakeProductStore {
    base_url: Url,
    state: Arc<FakeState>,
    handle: JoinHandle<()>,
}

struct FakeState {
    schema: ApiSchema,
    records: Mutex<Vec<Value>>,
    next_id: AtomicUsize,
    requests: AtomicUsize,
    /// Status returned for every request while non-zero.
    fail_status: AtomicU16,
    last_authorization: Mutex<Option<String>>,
}

impl FakeState {
    const fn key(&self) -> &'static str {
        match self.schema {
            ApiSchema::Backend => "product_id",
            ApiSchema::FakeStore => "id",
        }
    }

    fn records(&self) -> std::sync::MutexGuard<'_, Vec<Value>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wrap(&self, value: Value) -> Json<Value> {
        match self.schema {
            ApiSchema::Backend => Json(json!({ "data": value })),
            ApiSchema::FakeStore => Json(value),
        }
    }

    fn position(&self, records: &[Value], id: &str) -> Option<usize> {
        let key = self.key();
        records.iter().position(|r| match r.get(key) {
            Some(Value::String(s)) => s == id,
            Some(Value::Number(n)) => n.to_string() == id,
            _ => false,
        })
    }
}

impl FakeProductStore {
    /// Start an empty store speaking `schema`.
    pub async fn start(schema: ApiSchema) -> Self {
        let state = Arc::new(FakeState {
            schema,
            records: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            requests: AtomicUsize::new(0),
            fail_status: AtomicU16::new(0),
            last_authorization: Mutex::new(None),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake Product Store");
        let addr = listener.local_addr().expect("Failed to read local address");
        let app = router(Arc::clone(&state));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake Product Store error");
        });

        let base_url = Url::parse(&format!("http://{addr}/")).expect("Invalid fake store URL");
        Self {
            base_url,
            state,
            handle,
        }
    }

    /// Start a store pre-loaded with `products`.
    pub async fn with_products(schema: ApiSchema, products: &[Product]) -> Self {
        let store = Self::start(schema).await;
        for product in products {
            store.insert(product);
        }
        store
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client configuration pointing at this store.
    #[must_use]
    pub fn api_config(&self) -> ProductStoreConfig {
        ProductStoreConfig::new(self.base_url.clone(), self.state.schema)
    }

    /// Storefront configuration pointing at this store, storing data in
    /// `data_dir`.
    #[must_use]
    pub fn config(&self, data_dir: &Path) -> StorefrontConfig {
        StorefrontConfig {
            api: self.api_config(),
            data_dir: data_dir.to_path_buf(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Add a record directly, without counting a request.
    pub fn insert(&self, product: &Product) {
        let wire = match self.state.schema {
            ApiSchema::Backend => json!({
                "_id": format!("oid-{}", product.id),
                "product_id": product.id.as_str(),
                "name": product.name,
                "price": product.price,
                "stock": product.stock,
                "image": product.image,
                "description": product.description,
                "tags": product.tags,
                "launch_date": product.launched_at,
            }),
            ApiSchema::FakeStore => {
                let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
                json!({
                    "id": id,
                    "title": product.name,
                    "price": product.price,
                    "description": product.description,
                    "category": product.tags.first().cloned().unwrap_or_default(),
                    "image": product.image,
                })
            }
        };
        self.state.records().push(wire);
    }

    /// Raw records as the store holds them.
    #[must_use]
    pub fn records(&self) -> Vec<Value> {
        self.state.records().clone()
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Answer every request with `status` until [`recover`](Self::recover).
    pub fn fail_with(&self, status: StatusCode) {
        self.state.fail_status.store(status.as_u16(), Ordering::SeqCst);
    }

    pub fn recover(&self) {
        self.state.fail_status.store(0, Ordering::SeqCst);
    }

    /// The `Authorization` header of the last request, if it had one.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        self.state
            .last_authorization
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for FakeProductStore {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Three products used across the tests.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    vec![
        product("p-1", "Red Shirt", "19.99", &["服飾", "新品"]),
        product("p-2", "Blue Hat", "5.25", &["飾品配件"]),
        product("p-3", "Green Shirt", "12", &["服飾", "折扣"]),
    ]
}

/// Build a product with a single-word description and a placeholder image.
#[must_use]
pub fn product(id: &str, name: &str, price: &str, tags: &[&str]) -> Product {
    Product {
        id: ProductId::from_store(id),
        name: name.to_owned(),
        price: Price::parse(price).expect("Invalid test price"),
        stock: 10,
        image: format!("https://img.example/{id}.png"),
        description: format!("{name}!"),
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        launched_at: "2024-05-01T00:00:00.000Z".to_owned(),
    }
}

// =============================================================================
// Router
// =============================================================================

fn router(state: Arc<FakeState>) -> Router {
    let prefix = match state.schema {
        ApiSchema::Backend => "/api",
        ApiSchema::FakeStore => "",
    };

    Router::new()
        .route(&format!("{prefix}/products"), get(list).post(create))
        .route(
            &format!("{prefix}/products/{{id}}"),
            patch(update).delete(remove),
        )
        .route(&format!("{prefix}/auth/login"), post(login))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), track))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Count the request, remember its credentials and apply injected failures.
async fn track(State(state): State<Arc<FakeState>>, request: Request, next: Next) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    *state
        .last_authorization
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = authorization;

    let fail = state.fail_status.load(Ordering::SeqCst);
    if fail != 0 {
        let status = StatusCode::from_u16(fail).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "injected failure").into_response();
    }

    next.run(request).await
}

async fn list(State(state): State<Arc<FakeState>>) -> Json<Value> {
    let records = Value::Array(state.records().clone());
    state.wrap(records)
}

async fn create(State(state): State<Arc<FakeState>>, Json(mut body): Json<Value>) -> Response {
    if let Value::Object(fields) = &mut body {
        match state.schema {
            ApiSchema::Backend => {
                let oid = state.next_id.fetch_add(1, Ordering::SeqCst);
                fields.insert("_id".to_owned(), json!(format!("oid-{oid}")));
            }
            ApiSchema::FakeStore => {
                let id = state.next_id.fetch_add(1, Ordering::SeqCst);
                fields.insert("id".to_owned(), json!(id));
            }
        }
    }
    state.records().push(body.clone());
    (StatusCode::CREATED, state.wrap(body)).into_response()
}

async fn update(
    State(state): State<Arc<FakeState>>,
    UrlPath(id): UrlPath<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut records = state.records();
    let Some(index) = state.position(&records, &id) else {
        return (StatusCode::NOT_FOUND, "no such product").into_response();
    };
    let Some(Value::Object(record)) = records.get_mut(index) else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    if let Value::Object(changes) = body {
        for (key, value) in changes {
            record.insert(key, value);
        }
    }
    let updated = Value::Object(record.clone());
    drop(records);
    state.wrap(updated).into_response()
}

async fn remove(State(state): State<Arc<FakeState>>, UrlPath(id): UrlPath<String>) -> Response {
    let mut records = state.records();
    let Some(index) = state.position(&records, &id) else {
        return (StatusCode::NOT_FOUND, "no such product").into_response();
    };
    let removed = records.remove(index);
    drop(records);
    state.wrap(removed).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    let username = body.get("username").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();
    if username.is_empty() || password != PASSWORD {
        return (StatusCode::UNAUTHORIZED, "bad credentials").into_response();
    }
    Json(json!({ "token": format!("token-{username}") })).into_response()
}
