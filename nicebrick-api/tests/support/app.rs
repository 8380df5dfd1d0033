//! Shared harness for router-level tests.
//!
//! Builds the full router over a caller-chosen store and renderer and drives
//! it with `tower::ServiceExt::oneshot`, so no socket is ever bound.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use nicebrick_api::{create_api_router, ApiConfig, AppState};
use nicebrick_core::ContentCatalog;
use nicebrick_render::BearBrickRenderer;
use nicebrick_storage::{InMemoryKvStore, KvStore};
use tower::ServiceExt;

pub type TestError = Box<dyn std::error::Error + Send + Sync>;
pub type TestResult<T = ()> = Result<T, TestError>;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> TestResult<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> TestResult<String> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `code` of an error body.
    pub fn error_code(&self) -> TestResult<String> {
        Ok(self.json()?["code"].as_str().unwrap_or_default().to_string())
    }
}

pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// In-memory store and the built-in catalog, no renderer.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(InMemoryKvStore::new()), None)
    }

    pub fn with_parts(
        store: Arc<dyn KvStore>,
        renderer: Option<Arc<dyn BearBrickRenderer>>,
    ) -> Self {
        Self::from_state(AppState::new(
            ApiConfig::default(),
            ContentCatalog::builtin(),
            store,
            renderer,
        ))
    }

    pub fn from_state(state: AppState) -> Self {
        Self {
            router: create_api_router(state),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResult<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await?.to_bytes();
        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }

    pub async fn get(&self, uri: &str) -> TestResult<TestResponse> {
        self.send(Request::get(uri).body(Body::empty())?).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResult<TestResponse> {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
        )
        .await
    }
}
