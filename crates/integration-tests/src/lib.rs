//! Integration tests for Shopmax.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! shopmax-cli migrate
//!
//! # Start the server
//! cargo run -p shopmax-server
//!
//! # Run the ignored integration tests
//! cargo test -p shopmax-integration-tests -- --ignored
//! ```
//!
//! The server address is taken from `SHOPMAX_BASE_URL`
//! (default `http://localhost:8000`).

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SHOPMAX_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// A cookie-holding HTTP client plus the server base URL.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Create a fresh context with its own cookie jar.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url(),
        }
    }

    /// Register a new user (and pick up their session cookie).
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the server rejects the registration.
    pub async fn register(&self, email: &str, password: &str) -> Value {
        let resp = self
            .client
            .post(format!("{}/auth/join", self.base_url))
            .json(&json!({
                "email": email,
                "name": "Test User",
                "password": password,
                "address": "1 Test Street",
            }))
            .send()
            .await
            .expect("join request failed");
        assert_eq!(resp.status(), 201, "registration should succeed");
        resp.json().await.expect("invalid join response")
    }

    /// Generate a unique email so repeated runs don't collide.
    #[must_use]
    pub fn unique_email(prefix: &str) -> String {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        format!("{prefix}-{nanos}@test.shopmax.dev")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
