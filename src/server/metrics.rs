use metrics::{counter, describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::{sync::OnceLock, time::Duration};
use tokio::sync::RwLock;

fn spawn_process_collector() {
    tokio::spawn(async {
        let collector = metrics_process::Collector::default();
        collector.describe();

        loop {
            collector.collect();
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
}

// to prevent multiple initialization of the metrics recorder, happens in tests
static HANDLER: OnceLock<Arc<RwLock<PrometheusHandle>>> = OnceLock::new();

pub fn setup_metrics_recorder() -> Arc<RwLock<PrometheusHandle>> {
    HANDLER.get_or_init(internal_setup).clone()
}

fn internal_setup() -> Arc<RwLock<PrometheusHandle>> {
    let builder = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Note: we’re initializing the counters with 0, otherwise they’re not present
    // under `GET /metrics` right after startup, before anything happens.

    describe_counter!("http_requests_total", "HTTP calls made to set-gate API");

    describe_counter!(
        "set_lookups_total",
        "Set code lookups, labelled by outcome: found, not_found or error"
    );
    for outcome in ["found", "not_found", "error"] {
        counter!("set_lookups_total", "outcome" => outcome).absolute(0);
    }

    describe_histogram!(
        "catalog_fetch_duration_seconds",
        "Time spent fetching the set catalog from the remote service"
    );

    // One collector per installed recorder, however many routers get built
    spawn_process_collector();

    Arc::new(RwLock::new(builder))
}
