//! Scheduled probe loop
//!
//! Runs the probe once at startup and then once per period until cancelled.
//! Ticks are fixed-rate, anchored at startup. A cycle runs inline in the loop,
//! so only one probe is ever in flight; ticks missed while a cycle overruns
//! are skipped, not queued.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::ProbeConfig;
use crate::logging::{LogWriteError, LogWriter, Sink};
use crate::probe::{Probe, ProbeResult};

/// Default time between cycles
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000 * 60 * 60);

/// Startup failures. Nothing that happens inside a cycle ends up here.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Log directory unavailable: {0}")]
    LogDir(#[from] LogWriteError),
    #[error("Probe period must be non-zero")]
    ZeroPeriod,
}

/// What one cycle did
#[derive(Debug)]
pub struct CycleOutcome {
    pub result: ProbeResult,
    pub sink: Sink,
    /// File the line went to, `None` if the append failed
    pub written: Option<PathBuf>,
}

pub struct Scheduler {
    probe: Probe,
    writer: LogWriter,
    period: Duration,
}

impl Scheduler {
    pub fn new(probe: Probe, writer: LogWriter) -> Self {
        Self {
            probe,
            writer,
            period: DEFAULT_PERIOD,
        }
    }

    pub fn from_config(probe: Probe, writer: LogWriter, config: &ProbeConfig) -> Self {
        Self::new(probe, writer).with_period(Duration::from_secs(config.interval_secs))
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Probe once and route the result: success to the log sink, failure to the error sink.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let result = self.probe.run().await;

        let sink = match &result {
            ProbeResult::Success(_) => {
                info!("Probe succeeded");
                Sink::Log
            }
            ProbeResult::Failure(message) => {
                warn!("Probe failed: {}", message);
                Sink::Error
            }
        };

        let written = match self.writer.write(sink, &result.payload()) {
            Ok(path) => Some(path),
            Err(e) => {
                error!("Failed to record probe result: {}", e);
                None
            }
        };

        CycleOutcome {
            result,
            sink,
            written,
        }
    }

    /// Run until `shutdown` is cancelled, returning the number of cycles executed.
    ///
    /// Fails before the first cycle if the period is zero or the log directory
    /// cannot be created.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<u64, SchedulerError> {
        if self.period.is_zero() {
            return Err(SchedulerError::ZeroPeriod);
        }
        self.writer.ensure_dir()?;
        info!(
            "Probe scheduler started: every {}s, logging to {}",
            self.period.as_secs(),
            self.writer.dir().display()
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut cycles = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Probe scheduler stopping after {} cycles", cycles);
                    break;
                }
                // First tick completes immediately
                _ = ticker.tick() => {
                    self.run_cycle().await;
                    cycles += 1;
                }
            }
        }

        Ok(cycles)
    }
}
