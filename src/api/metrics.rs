use axum::response::{Extension, IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::sync::RwLock;

pub async fn route(
    Extension(prometheus_handle): Extension<Arc<RwLock<PrometheusHandle>>>,
) -> impl IntoResponse {
    let handle = prometheus_handle.read().await;

    handle.render()
}
