//! Set code validation against the live catalog.

use crate::catalog::CatalogClient;
use crate::errors::ApiError;
use crate::types::ApiResult;
use axum::Json;
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct SetParams {
    pub set: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetResponse {
    pub set: String,
}

/// Trims surrounding whitespace and lowercases.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Checks the normalized candidate against `catalog`, comparing entries as
/// the catalog delivers them.
pub fn validate(raw: &str, catalog: &[String]) -> Result<SetResponse, ApiError> {
    let set = normalize(raw);

    if catalog.iter().any(|code| *code == set) {
        Ok(SetResponse { set })
    } else {
        Err(ApiError::set_not_found())
    }
}

/// Fetches the catalog once and validates `params.set` against it.
pub async fn load(params: SetParams, catalog: &CatalogClient) -> ApiResult<SetResponse> {
    let codes = match catalog.fetch_codes().await {
        Ok(codes) => codes,
        Err(e) => {
            counter!("set_lookups_total", "outcome" => "error").increment(1);
            return Err(e);
        },
    };

    match validate(&params.set, &codes) {
        Ok(found) => {
            counter!("set_lookups_total", "outcome" => "found").increment(1);
            Ok(Json(found))
        },
        Err(e) => {
            counter!("set_lookups_total", "outcome" => "not_found").increment(1);
            debug!(requested = %params.set, catalog_size = codes.len(), "Unknown set code");
            Err(e)
        },
    }
}
