use crate::{
    config::{CatalogConfig, Config, DEFAULT_CATALOG_URL},
    errors::AppError,
    types::LogLevel,
};
use anyhow::{Error, Result, anyhow};
use clap::{CommandFactory, Parser, ValueEnum};
use inquire::validator::{ErrorMessage, Validation};
use inquire::{Confirm, Select, Text};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use twelf::{Layer, config};

const ENV_PREFIX: &str = "SET_GATE_";

static SHOULD_SKIP_SERIALIZNG_FIELDS: AtomicBool = AtomicBool::new(false);

fn should_skip_serializng_fields<T>(_: &T) -> bool {
    SHOULD_SKIP_SERIALIZNG_FIELDS.load(Ordering::SeqCst)
}

#[derive(Parser, Debug, Serialize, Clone)]
#[command(author,
          version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_REVISION"), ")"),
          about,
          long_about = None)]
#[config]
pub struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    pub server_address: IpAddr,

    #[arg(long, default_value = "3000")]
    pub server_port: u16,

    /// Maximum number of requests served at the same time
    #[arg(long, default_value = "1024")]
    pub server_concurrency_limit: usize,

    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Endpoint returning the set catalog as `{"data": [{"code": ...}]}`
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    #[arg(long = "catalog-timeout-sec", default_value = "30")]
    pub catalog_timeout: u64,

    #[arg(long)]
    pub no_metrics: bool,

    #[arg(long)]
    pub sentry_dsn: Option<String>,

    #[arg(long, help = "Initialize a new configuration file")]
    #[serde(skip_serializing_if = "should_skip_serializng_fields")]
    #[serde(default)]
    init: bool,

    #[arg(long, help = "Path to an existing configuration file")]
    #[serde(skip_serializing_if = "should_skip_serializng_fields")]
    config: Option<PathBuf>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("set-gate").join("config.toml"))
}

impl Args {
    fn parse_args(config_path: Option<&Path>) -> Result<Args, AppError> {
        let matches = Self::command().get_matches();

        let mut config_layers = vec![
            Layer::Env(Some(String::from(ENV_PREFIX))),
            Layer::Clap(matches),
        ];

        if let Some(path) = config_path.filter(|path| path.exists()) {
            config_layers.insert(0, Layer::Toml(path.to_path_buf()));
        }

        Self::with_layers(&config_layers).map_err(|e| match e {
            twelf::Error::Toml(_) => AppError::Server(format!(
                "Failed to parse config file '{}'",
                config_path.unwrap_or(Path::new("")).to_string_lossy()
            )),
            _ => AppError::Server(e.to_string()),
        })
    }

    pub fn init() -> Result<Config, AppError> {
        let initial_args = Args::parse();
        let config_path = initial_args.config.or_else(default_config_path);

        let arguments = Args::parse_args(config_path.as_deref())?;

        SHOULD_SKIP_SERIALIZNG_FIELDS.store(true, Ordering::SeqCst);

        if arguments.init {
            let path = config_path.ok_or(AppError::Server(
                "Could not determine config directory, pass --config".into(),
            ))?;

            Args::generate_config(&path).map_err(|e| AppError::Server(e.to_string()))?;
            std::process::exit(0);
        }

        Config::from_args(arguments)
    }

    fn enum_prompt<T: std::fmt::Debug>(
        message: &str,
        enum_values: &[T],
        starting_cursor: usize,
    ) -> Result<String> {
        Select::new(
            message,
            enum_values
                .iter()
                .map(|it| format!("{it:?}"))
                .collect::<Vec<_>>(),
        )
        .with_starting_cursor(starting_cursor)
        .prompt()
        .map_err(|e| anyhow!(e))
    }

    fn to_file(&self, file_path: &Path) -> Result<()> {
        let toml_string = toml::to_string(self).map_err(Error::new)?;
        let mut file = fs::File::create(file_path)?;
        file.write_all(toml_string.as_bytes())?;
        Ok(())
    }

    fn generate_config(config_path: &Path) -> Result<()> {
        let metrics = Confirm::new("Enable metrics?")
            .with_default(true)
            .with_help_message("Should GET /metrics be served?")
            .prompt()?;

        let log_level = Args::enum_prompt(
            "What should be the log level?",
            LogLevel::value_variants(),
            1,
        )
        .and_then(|it| LogLevel::from_str(it.as_str(), true).map_err(|e| anyhow!(e)))?;

        let server_address: IpAddr = Text::new("Enter the server IP address:")
            .with_default("0.0.0.0")
            .with_validator(|input: &str| {
                input
                    .parse::<IpAddr>()
                    .map(|_| Validation::Valid)
                    .or_else(|_| {
                        Ok(Validation::Invalid(ErrorMessage::Custom(
                            "Invalid IP address".into(),
                        )))
                    })
            })
            .prompt()?
            .parse()?;

        let server_port = Text::new("Enter the port number:")
            .with_default("3000")
            .with_validator(|input: &str| match input.parse::<u16>() {
                Ok(port) if port >= 1 => Ok(Validation::Valid),
                _ => Ok(Validation::Invalid(ErrorMessage::Custom(
                    "Invalid port number. It must be between 1 and 65535".into(),
                ))),
            })
            .prompt()
            .map_err(|e| anyhow!(e))
            .and_then(|it| it.parse::<u16>().map_err(|e| anyhow!(e)))?;

        let catalog_url = Text::new("Enter the set catalog URL:")
            .with_default(DEFAULT_CATALOG_URL)
            .with_validator(|input: &str| match CatalogConfig::new(input, 30) {
                Ok(_) => Ok(Validation::Valid),
                Err(e) => Ok(Validation::Invalid(ErrorMessage::Custom(e.to_string()))),
            })
            .prompt()?;

        let app_config = Args {
            init: false,
            config: None,
            no_metrics: !metrics,
            log_level,
            server_address,
            server_port,
            server_concurrency_limit: 1024,
            catalog_url,
            catalog_timeout: 30,
            sentry_dsn: None,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        app_config.to_file(config_path)?;
        println!("\nConfig has been written to {config_path:?}");

        Ok(())
    }
}
