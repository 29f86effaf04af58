//! Application initialization
//! Handles config loading, logging setup, and component initialization

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use crate::api::ZohoCrmClient;
use crate::config::{self, Config};
use crate::logging::{resolve_log_dir, LogWriter};
use crate::probe::Probe;
use crate::scheduler::Scheduler;

/// Initialize logging. `RUST_LOG` overrides the configured level.
pub fn init_logging(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_log_level(log_level).to_string().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Parse log level string
fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Load the config file, falling back to environment variables only when
/// there is no file at all
pub fn load_config() -> Result<Config> {
    load_config_from(Config::locate())
}

fn load_config_from(path: Option<PathBuf>) -> Result<Config> {
    let Some(path) = path else {
        return config::from_env();
    };

    let config = Config::from_file(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}

/// Initialize the shared CRM client handle
pub async fn init_client(config: &Config) -> Result<Arc<ZohoCrmClient>> {
    let client = ZohoCrmClient::initialize(&config.crm)
        .await
        .context("Failed to initialize CRM client")?;
    Ok(Arc::new(client))
}

/// Wire probe, log writer and scheduler around an initialized client
pub fn build_scheduler(config: &Config, client: Arc<ZohoCrmClient>) -> Scheduler {
    let log_dir = resolve_log_dir(config.probe.log_dir.clone());
    info!("Probe logs go to {}", log_dir.display());

    let probe = Probe::from_config(client, &config.probe);
    Scheduler::from_config(probe, LogWriter::with_system_clock(log_dir), &config.probe)
}
