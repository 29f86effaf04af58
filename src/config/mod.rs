//! Configuration management
//! Supports TOML, YAML, JSON config files

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "ZCRM_CONFIG";

/// Searched in the working directory, in order
pub const DEFAULT_LOCATIONS: [&str; 5] = [".env.json", "zcrm.toml", "zcrm.yaml", "zcrm.yml", "zcrm.json"];

/// SDK and harness configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CRM client settings and credentials
    pub crm: CrmConfig,
    /// Scheduled probe settings
    pub probe: ProbeConfig,
    /// Logging level
    pub log_level: Option<String>,
    /// Emit diagnostic logs as JSON
    pub json_logs: bool,
}

/// CRM client configuration, passed to `ZohoCrmClient::initialize`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmConfig {
    /// API domain of the data center, e.g. `https://www.zohoapis.eu`
    pub api_domain: String,
    pub api_version: String,
    /// Accounts server used for the refresh-token grant
    pub accounts_url: String,
    pub access_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    /// Whole-request timeout in seconds (default: 30)
    pub request_timeout_secs: u64,
}

/// Scheduled probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Module queried by each probe (default: Leads)
    pub module: String,
    /// Page requested (default: 0)
    pub page: u32,
    /// Records per page (default: 1)
    pub per_page: u32,
    /// Seconds between cycles (default: 3600)
    pub interval_secs: u64,
    /// Seconds before a probe is abandoned (default: 60)
    pub timeout_secs: u64,
    /// Directory for the day-stamped log files
    pub log_dir: Option<PathBuf>,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            api_domain: "https://www.zohoapis.com".to_string(),
            api_version: "v2".to_string(),
            accounts_url: "https://accounts.zoho.com".to_string(),
            access_token: None,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            request_timeout_secs: 30,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            module: "Leads".to_string(),
            page: 0,
            per_page: 1,
            interval_secs: 60 * 60,
            timeout_secs: 60,
            log_dir: None,
        }
    }
}

impl CrmConfig {
    /// Check the client settings and that some credential source is present
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.api_domain.starts_with("https://") || self.api_domain.starts_with("http://")) {
            anyhow::bail!("api_domain must be an http(s) URL: {}", self.api_domain);
        }
        if self.api_version.is_empty() {
            anyhow::bail!("api_version is required");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }

        let has = |v: &Option<String>| v.as_deref().map(|s| !s.is_empty()).unwrap_or(false);
        let has_refresh = has(&self.refresh_token) && has(&self.client_id) && has(&self.client_secret);
        if !has(&self.access_token) && !has_refresh {
            anyhow::bail!(
                "Either access_token or refresh_token + client_id + client_secret is required"
            );
        }
        Ok(())
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.module.is_empty() {
            anyhow::bail!("Probe module is required");
        }
        if self.per_page == 0 {
            anyhow::bail!("per_page must be at least 1");
        }
        if self.interval_secs == 0 {
            anyhow::bail!("Probe interval must be at least 1 second");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("Probe timeout must be at least 1 second");
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config = match extension {
            "toml" => toml::from_str(&content)?,
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            // Unknown extension, sniff the content
            _ if content.trim().starts_with('{') => serde_json::from_str(&content)?,
            _ if content.contains("---") => serde_yaml::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Config file to read: `ZCRM_CONFIG` if set, else the first default
    /// location that exists
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        DEFAULT_LOCATIONS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
            .or_else(|| {
                dirs::config_dir()
                    .map(|dir| dir.join("zoho-crm-sdk/config.toml"))
                    .filter(|path| path.exists())
            })
    }

    /// Load from `ZCRM_CONFIG` or the default locations
    pub fn load() -> anyhow::Result<Self> {
        match Self::locate() {
            Some(path) => Self::from_file(path),
            None => anyhow::bail!(
                "No configuration file found. Expected one of: {:?}",
                DEFAULT_LOCATIONS
            ),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.crm.validate()?;
        self.probe.validate()?;
        Ok(())
    }
}

/// Load config from environment variables (fallback)
pub fn from_env() -> anyhow::Result<Config> {
    use std::env;

    let defaults = Config::default();
    let config = Config {
        crm: CrmConfig {
            api_domain: env::var("ZCRM_API_DOMAIN").unwrap_or(defaults.crm.api_domain),
            api_version: env::var("ZCRM_API_VERSION").unwrap_or(defaults.crm.api_version),
            accounts_url: env::var("ZCRM_ACCOUNTS_URL").unwrap_or(defaults.crm.accounts_url),
            access_token: env::var("ZCRM_ACCESS_TOKEN").ok(),
            client_id: env::var("ZCRM_CLIENT_ID").ok(),
            client_secret: env::var("ZCRM_CLIENT_SECRET").ok(),
            refresh_token: env::var("ZCRM_REFRESH_TOKEN").ok(),
            request_timeout_secs: env::var("ZCRM_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.crm.request_timeout_secs),
        },
        probe: ProbeConfig {
            module: env::var("ZCRM_MODULE").unwrap_or(defaults.probe.module),
            page: defaults.probe.page,
            per_page: defaults.probe.per_page,
            interval_secs: env::var("ZCRM_PROBE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.probe.interval_secs),
            timeout_secs: env::var("ZCRM_PROBE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.probe.timeout_secs),
            log_dir: None,
        },
        log_level: env::var("LOG_LEVEL").ok(),
        json_logs: env::var("LOG_JSON")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(false),
    };

    config.validate()?;
    Ok(config)
}
