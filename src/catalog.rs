use crate::config::CatalogConfig;
use crate::errors::{ApiError, AppError};
use metrics::histogram;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, error};

/// Body of the catalog endpoint. Only the codes are read, every other field
/// the remote service sends is ignored.
#[derive(Debug, Deserialize)]
pub struct SetListResponse {
    pub data: Vec<SetEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SetEntry {
    pub code: String,
}

impl SetListResponse {
    pub fn into_codes(self) -> Vec<String> {
        self.data.into_iter().map(|set| set.code).collect()
    }
}

#[derive(Clone, Debug)]
pub struct CatalogClient {
    endpoint: Url,
    client: Client,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Catalog(format!("failed to build client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches the current list of set codes, in catalog order.
    pub async fn fetch_codes(&self) -> Result<Vec<String>, ApiError> {
        let started = Instant::now();
        let url = self.endpoint.as_str();

        let resp = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| {
                error!(url, error = %e, "Catalog request failed");
                e
            })?;
        let status = resp.status();
        let body_text = resp.text().await?;

        histogram!("catalog_fetch_duration_seconds").record(started.elapsed().as_secs_f64());

        // A 404 from upstream says nothing about the requested set.
        if !status.is_success() {
            error!(url, status = %status, response_body = %body_text, "Catalog request failed");

            return Err(ApiError::internal_server_error(format!(
                "Catalog responded with {status}"
            )));
        }

        let body: SetListResponse = serde_json::from_str(&body_text).map_err(|e| {
            error!(
                url,
                status = %status,
                response_body = %body_text,
                error = %e,
                "Failed to parse catalog response"
            );
            e
        })?;

        let codes = body.into_codes();
        debug!(url, count = codes.len(), "Fetched set catalog");

        Ok(codes)
    }
}
