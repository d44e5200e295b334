use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt::format::Format};

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn setup_tracing(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(
            Format::default()
                .with_ansi(true)
                .with_level(true)
                .with_target(false)
                .compact(),
        )
        .init();
}
