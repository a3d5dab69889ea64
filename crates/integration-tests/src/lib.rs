//! Integration tests for Pocket Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-cart-integration-tests
//! ```
//!
//! The tests drive the real storefront router in-process with
//! `tower::ServiceExt::oneshot`; no server or network is needed.
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart page, HTMX fragments and persistence
//! - `storefront_checkout` - Checkout form behaviour

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use pocket_cart_core::{KeyValueStore, MemoryStore};
use pocket_cart_storefront::config::StorefrontConfig;
use pocket_cart_storefront::state::AppState;
use pocket_cart_storefront::{app, catalog};
use tower::ServiceExt;

/// A response reduced to what the tests look at.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub hx_trigger: Option<String>,
    pub location: Option<String>,
    pub body: String,
}

/// A storefront router over the built-in catalog and a given store.
pub struct TestContext {
    pub router: Router,
    pub store: Arc<dyn KeyValueStore>,
}

impl TestContext {
    /// Fresh storefront with an empty in-memory store.
    ///
    /// # Panics
    ///
    /// Panics if the built-in catalog is invalid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Storefront restoring its cart from `store`.
    ///
    /// # Panics
    ///
    /// Panics if the built-in catalog is invalid or the store cannot be read.
    #[must_use]
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        let config = StorefrontConfig {
            static_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/static"),
            ..StorefrontConfig::default()
        };
        let catalog = catalog::builtin().expect("built-in catalog is valid");
        let state = AppState::new(config, catalog, Arc::clone(&store)).expect("store is readable");

        Self {
            router: app(state),
            store,
        }
    }

    /// Persisted cart as JSON, if anything has been written.
    ///
    /// # Panics
    ///
    /// Panics if the store fails or holds invalid JSON.
    #[must_use]
    pub fn stored_cart(&self) -> Option<serde_json::Value> {
        self.store
            .get("cart")
            .expect("store is readable")
            .map(|raw| serde_json::from_str(&raw).expect("stored cart is JSON"))
    }

    /// Send a GET request.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    /// Send a form-encoded POST request, as a browser without JS would.
    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        self.send(form_request(uri, form, false)).await
    }

    /// Send a form-encoded POST request the way HTMX issues it.
    pub async fn post_htmx(&self, uri: &str, form: &str) -> TestResponse {
        self.send(form_request(uri, form, true)).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let header_value = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(String::from)
        };
        let hx_trigger = header_value("hx-trigger");
        let location = header_value("location");

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");

        TestResponse {
            status,
            hx_trigger,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

fn form_request(uri: &str, form: &str, htmx: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if htmx {
        builder = builder.header("HX-Request", "true");
    }
    builder
        .body(Body::from(form.to_owned()))
        .expect("valid request")
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
