//! Long-running connectivity probe
//!
//! Checks for failures that only show up in long-lived processes: token
//! expiry, dropped connections, credential revocation. Probes once at startup
//! and then every hour, writing each outcome to day-stamped files in
//! `ZCRM_TEST_LONG_LOG_DIR` (default: next to the executable). Runs until
//! interrupted.

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;
use zoho_crm_sdk::app;
use zoho_crm_sdk::VERSION;

#[tokio::main]
async fn main() -> Result<()> {
    let config = app::load_config()?;
    app::init_logging(config.log_level.as_deref().unwrap_or("info"), config.json_logs);

    info!("Starting crm-probe v{}", VERSION);
    info!("  Module: {}", config.probe.module);
    info!("  Interval: {}s", config.probe.interval_secs);
    info!("  Timeout: {}s", config.probe.timeout_secs);

    // Initialization failure is the one fatal runtime error
    let client = app::init_client(&config).await?;
    let scheduler = app::build_scheduler(&config, client);

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Interrupt received, shutting down");
            shutdown.cancel();
        });
    }

    let cycles = scheduler.run(shutdown).await?;
    info!("Stopped after {} probe cycles", cycles);
    Ok(())
}
