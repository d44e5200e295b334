#![allow(dead_code)]

pub mod mock_catalog;

use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{Method, Request, StatusCode},
};
use set_gate::{
    AppError,
    config::{CatalogConfig, Config},
    server::build,
    types::LogLevel,
};
use std::sync::{Arc, LazyLock};
use tower::ServiceExt;

static INIT_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt::init();
});

pub fn initialize_logging() {
    let _ = *INIT_LOGGING;
}

pub fn test_config(catalog_url: &str, timeout_secs: u64) -> Arc<Config> {
    let config = Config {
        server_address: "0.0.0.0".parse().unwrap(),
        server_port: 3000,
        server_concurrency_limit: 64,
        log_level: LogLevel::Info.into(),
        catalog: CatalogConfig::new(catalog_url, timeout_secs).unwrap(),
        no_metrics: false,
        sentry_dsn: None,
    };

    Arc::new(config)
}

pub fn build_app(catalog_url: &str) -> Result<Router, AppError> {
    build(test_config(catalog_url, 5))
}

pub async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Bytes) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Request failed");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");

    (status, body)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Bytes) {
    send(app, Method::GET, uri).await
}
