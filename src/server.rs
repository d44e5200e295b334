pub mod logging;
pub mod metrics;
pub mod routes;
pub mod state;

use crate::{
    catalog::CatalogClient,
    config::Config,
    errors::{ApiError, AppError},
    middlewares::errors::error_middleware,
};
use axum::{Extension, Router, middleware::from_fn};
use self::metrics::setup_metrics_recorder;
use self::routes::get_api_routes;
use self::state::AppState;
use std::sync::Arc;
use tower::{Layer, limit::ConcurrencyLimitLayer};
use tower_http::normalize_path::NormalizePathLayer;
use tracing::info;

/// Builds and configures the Axum `Router`.
/// Returns `Ok(Router)` on success or an `AppError` if a step fails.
pub fn build(config: Arc<Config>) -> Result<Router, AppError> {
    // Setting up the metrics recorder needs to be the very first step before
    // doing anything that uses metrics, or the initial data will be lost:
    let metrics_handle = if !config.no_metrics {
        Some(setup_metrics_recorder())
    } else {
        None
    };

    let catalog = CatalogClient::new(&config.catalog)?;
    info!("Using set catalog at {}", catalog.endpoint());

    let app_state = AppState { catalog };

    // Add layers
    let inner = {
        let mut routes = get_api_routes(!config.no_metrics)
            .with_state(app_state)
            .layer(from_fn(error_middleware))
            .fallback(ApiError::not_found());

        if let Some(prom_handler) = metrics_handle {
            routes = routes.layer(Extension(prom_handler));
        }

        routes
    };

    let inner = NormalizePathLayer::trim_trailing_slash().layer(inner);
    let app = Router::new()
        .fallback_service(inner)
        .layer(ConcurrencyLimitLayer::new(config.server_concurrency_limit));

    Ok(app)
}
