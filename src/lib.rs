//! Zoho CRM SDK
//!
//! Features:
//! - Records and COQL API client with OAuth token handling
//! - Day-stamped durable logging for probe outcomes
//! - Scheduled connectivity probe for long-running credential checks

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod probe;
pub mod scheduler;

// Re-export commonly used types
pub use api::{ApiError, ApiResponse, CoqlQuery, CrmApi, RecordsParams, RecordsRequest, ZohoCrmClient};
pub use config::{Config, CrmConfig, ProbeConfig};
pub use logging::{Clock, LogWriteError, LogWriter, ManualClock, Sink, SystemClock};
pub use probe::{Probe, ProbeResult};
pub use scheduler::{CycleOutcome, Scheduler, SchedulerError};

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
