//! Startup wiring shared by the harness binaries

pub mod init;

pub use init::{build_scheduler, init_client, init_logging, load_config};
