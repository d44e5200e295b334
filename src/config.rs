use crate::cli::Args;
use crate::errors::AppError;
use reqwest::Url;
use std::net::IpAddr;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_CATALOG_URL: &str = "https://api.scryfall.com/sets";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: IpAddr,
    pub server_port: u16,
    pub server_concurrency_limit: usize,
    pub log_level: Level,
    pub catalog: CatalogConfig,
    pub no_metrics: bool,
    pub sentry_dsn: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub endpoint: Url,
    pub request_timeout: Duration,
}

impl CatalogConfig {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, AppError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            AppError::Server(format!("--catalog-url '{endpoint}' is not a valid URL: {e}"))
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AppError::Server(format!(
                "--catalog-url must use http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        if timeout_secs == 0 {
            return Err(AppError::Server(
                "--catalog-timeout-sec must be greater than 0".into(),
            ));
        }

        Ok(Self {
            endpoint,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, AppError> {
        let catalog = CatalogConfig::new(&args.catalog_url, args.catalog_timeout)?;

        if args.server_concurrency_limit == 0 {
            return Err(AppError::Server(
                "--server-concurrency-limit must be greater than 0".into(),
            ));
        }

        // An empty DSN in a config file or environment means "disabled".
        let sentry_dsn = args.sentry_dsn.filter(|dsn| !dsn.trim().is_empty());

        Ok(Config {
            server_address: args.server_address,
            server_port: args.server_port,
            server_concurrency_limit: args.server_concurrency_limit,
            log_level: args.log_level.into(),
            catalog,
            no_metrics: args.no_metrics,
            sentry_dsn,
        })
    }
}
