//! Connectivity probe
//! One minimal records request to confirm the CRM is reachable and the credentials work

use futures::FutureExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::api::{CrmApi, RecordsRequest};
use crate::config::ProbeConfig;

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult {
    /// Reply body, kept opaque
    Success(serde_json::Value),
    /// Why the request failed
    Failure(String),
}

impl ProbeResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeResult::Success(_))
    }

    /// Text written to the log file for this outcome
    pub fn payload(&self) -> String {
        match self {
            ProbeResult::Success(body) => body.to_string(),
            ProbeResult::Failure(message) => message.clone(),
        }
    }
}

/// Issues the probe request against a shared client handle
pub struct Probe {
    client: Arc<dyn CrmApi>,
    request: RecordsRequest,
    timeout: Duration,
}

impl Probe {
    /// Probe with the minimal request: `Leads`, page 0, one record
    pub fn new(client: Arc<dyn CrmApi>) -> Self {
        Self::from_config(client, &ProbeConfig::default())
    }

    pub fn from_config(client: Arc<dyn CrmApi>, config: &ProbeConfig) -> Self {
        Self {
            client,
            request: RecordsRequest::new(config.module.clone(), config.page, config.per_page),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Sets the timeout for this probe.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the request. Errors, timeouts and panics all come back as `Failure`.
    pub async fn run(&self) -> ProbeResult {
        let start = Instant::now();
        debug!(module = %self.request.module, "Running probe");

        let call = std::panic::AssertUnwindSafe(async {
            self.client.get_records(&self.request).await
        })
        .catch_unwind();

        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(Ok(response))) => ProbeResult::Success(response.body),
            Ok(Ok(Err(e))) => ProbeResult::Failure(e.to_string()),
            Ok(Err(panic)) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!("Probe request panicked: {}", message);
                ProbeResult::Failure(format!("request panicked: {}", message))
            }
            Err(_) => ProbeResult::Failure(format!("request timed out after {:?}", self.timeout)),
        };

        debug!(
            success = result.is_success(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Probe finished"
        );
        result
    }
}
