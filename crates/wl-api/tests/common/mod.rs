use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde::Deserialize;
use tower::ServiceExt;
use uuid::Uuid;
use wl_api::{ApiConfig, auth::jwt::generate_jwt_token, router, state::ApiState};
use wl_db::{MemoryStore, WordContent};

pub const TEST_JWT_SECRET: &str = "test_jwt_secret_minimum_32_characters_long";

/// Builds an `ApiState` over an in-process store
pub struct TestStateBuilder {
    vars: Vec<(String, String)>,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            vars: vec![
                (
                    "DATABASE_URL".to_string(),
                    "postgres://unused@localhost/wordloop_test".to_string(),
                ),
                ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
            ],
        }
    }

    /// Override a configuration variable, e.g. `("MASTERY_THRESHOLD", "5")`
    pub fn var(mut self, key: &str, value: &str) -> Self {
        self.vars.retain(|(k, _)| k != key);
        self.vars.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> (ApiState, Arc<MemoryStore>) {
        let config = ApiConfig::from_vars(self.vars).expect("Invalid test configuration");
        let store = Arc::new(MemoryStore::new());
        let state = ApiState::in_memory(&config, store.clone());
        (state, store)
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A router over a fresh in-memory state, plus the store for seeding
pub fn test_app() -> (TestClient, Arc<MemoryStore>, ApiState) {
    let (state, store) = TestStateBuilder::new().build();
    let client = TestClient::new(router::router().with_state(state.clone()));
    (client, store, state)
}

/// Issue a valid token for `user_id`
pub fn token_for(user_id: Uuid) -> String {
    generate_jwt_token(user_id, TEST_JWT_SECRET, 1).expect("Failed to generate token")
}

/// Create a word owned by `user` inside `deck`
pub fn seed_word(store: &MemoryStore, user: Uuid, deck: Uuid, text: &str) -> WordContent {
    let word = WordContent {
        id: Uuid::new_v4(),
        word: text.to_string(),
        translation: format!("{text} (translation)"),
        example: format!("Example with {text}"),
        pronunciation: String::new(),
    };
    store
        .add_word(user, deck, word.clone())
        .expect("Failed to seed word");
    word
}

/// Helper to make requests to the test app
#[derive(Clone)]
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a GET request with a bearer token
    pub async fn get_with_auth(&self, uri: &str, token: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .expect("Failed to build authenticated request");

        self.request(request).await
    }

    /// Send a POST request with JSON body and no credentials
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body and a bearer token
    pub async fn post_json_with_auth<T: serde::Serialize>(
        &self,
        uri: &str,
        body: &T,
        token: &str,
    ) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(json_body))
            .expect("Failed to build authenticated request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }
}
