//! linkmgrd - interface reconciler entry point
//!
//! Invoked once per changed interface instance by an external driver.
//! The instance name arrives in `LINKMGR_INSTANCE`; the configuration
//! snapshot (desired + effective trees) is read from the JSON file named
//! by `LINKMGR_CONFIG`.

use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use linkmgr_common::config::ConfigTree;
use linkmgrd::LinkMgr;

/// Environment variable carrying the target interface instance name.
const INSTANCE_ENV: &str = "LINKMGR_INSTANCE";

/// Environment variable overriding the configuration snapshot path.
const CONFIG_ENV: &str = "LINKMGR_CONFIG";

/// Default configuration snapshot path.
const DEFAULT_CONFIG_PATH: &str = "/run/linkmgr/config.json";

/// Initializes tracing/logging subsystem
fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn load_config() -> anyhow::Result<ConfigTree> {
    let path =
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading configuration snapshot '{}'", path))?;
    ConfigTree::from_json_str(&raw)
        .with_context(|| format!("parsing configuration snapshot '{}'", path))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let name = match std::env::var(INSTANCE_ENV) {
        Ok(name) if !name.is_empty() => name,
        _ => {
            error!("Interface instance ({}) not specified", INSTANCE_ENV);
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut mgr = LinkMgr::system(config);
    match mgr.reconcile(&name).await {
        Ok(()) => {
            info!("{} reconciled", name);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
