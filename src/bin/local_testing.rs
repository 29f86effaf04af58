//! Direct API test for debugging
//!
//! Reads credentials the same way as `crm-probe` (`ZCRM_CONFIG`, `.env.json`,
//! ...), fetches the first five `Leads` and prints the body. Keep the
//! credentials file out of version control.

use anyhow::Result;
use zoho_crm_sdk::{app, CrmApi, RecordsRequest};

#[tokio::main]
async fn main() -> Result<()> {
    let config = app::load_config()?;
    app::init_logging(config.log_level.as_deref().unwrap_or("warn"), false);

    let client = app::init_client(&config).await?;

    let request = RecordsRequest::new("Leads", 0, 5);
    let response = client.get_records(&request).await?;

    println!("{}", serde_json::to_string_pretty(&response.body)?);
    Ok(())
}
