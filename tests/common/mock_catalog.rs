use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

/// In-process stand-in for the remote set catalog, served under `/sets`.
pub struct MockCatalog {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl MockCatalog {
    pub async fn with_codes(codes: &[&str]) -> Self {
        let data: Vec<_> = codes
            .iter()
            .map(|code| {
                json!({
                    "object": "set",
                    "code": code,
                    "name": format!("Test set {code}"),
                    "set_type": "expansion",
                })
            })
            .collect();

        let body = json!({ "object": "list", "has_more": false, "data": data }).to_string();

        Self::start(StatusCode::OK, body, Duration::ZERO).await
    }

    pub async fn failing() -> Self {
        let body = json!({
            "object": "error",
            "code": "unavailable",
            "status": 503,
            "details": "The catalog is down for maintenance.",
        })
        .to_string();

        Self::start(StatusCode::SERVICE_UNAVAILABLE, body, Duration::ZERO).await
    }

    pub async fn malformed() -> Self {
        Self::start(StatusCode::OK, "<html>not json</html>".to_string(), Duration::ZERO).await
    }

    pub async fn slow(delay: Duration) -> Self {
        let body = json!({ "data": [{ "code": "mh3" }] }).to_string();

        Self::start(StatusCode::OK, body, delay).await
    }

    pub fn unreachable() -> Self {
        Self {
            url: "http://127.0.0.1:1/sets".to_string(),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of catalog requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    async fn start(status: StatusCode, body: String, delay: Duration) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let mock_app = Router::new().route(
            "/sets",
            get(move || {
                let body = body.clone();
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(delay).await;
                    (
                        status,
                        [(axum::http::header::CONTENT_TYPE, "application/json")],
                        body,
                    )
                        .into_response()
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = format!("http://{addr}/sets");

        tokio::spawn(async move {
            axum::serve(listener, mock_app).await.unwrap();
        });

        tokio::time::sleep(Duration::from_millis(50)).await;

        Self { url, hits }
    }
}
