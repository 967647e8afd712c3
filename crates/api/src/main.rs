//! vsme-sync - replays module saves that were kept on this device
//!
//! Loads configuration, wires the application context and pushes every
//! locally stored failed save to the Report Data Store.

use std::process::ExitCode;

use tracing::{error, info, warn};
use vsme_api::AppContext;
use vsme_domain::Result;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match vsme_infra::config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("vsme-sync: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = vsme_infra::init_tracing(&config.logging) {
        eprintln!("vsme-sync: {err}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "sync run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: vsme_domain::Config) -> Result<()> {
    let ctx = AppContext::new_with_config(config).await?;

    let health = ctx.health_check().await;
    for component in health.components.iter().filter(|c| !c.is_healthy) {
        warn!(component = %component.name, message = ?component.message, "component unhealthy");
    }

    let results = ctx.modules.recover_failed_saves().await?;
    let recovered = results.iter().filter(|r| r.success).count();
    info!(recovered, remaining = results.len() - recovered, "failed save recovery finished");

    ctx.shutdown().await;
    Ok(())
}
