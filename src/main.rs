pub mod config;
pub mod controller;
pub mod pointer;

use crate::config::AppConfig;
use crate::controller::PollerHandle;
use color_eyre::{eyre::eyre, Result};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let config = setup().await?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_interrupt(tokio::signal::ctrl_c(), cancel.clone()));

    info!("Starting button mouse on HAT pins");
    PollerHandle::run(Some(config.poller), cancel)
        .await
        .map_err(|e| eyre!("Button mouse stopped: {}", e))?;

    info!("Shutdown complete");
    Ok(())
}

/// Cancels `shutdown` once `interrupt` resolves. Without a handler the
/// default signal disposition still terminates the process, so polling goes on.
async fn cancel_on_interrupt<F>(interrupt: F, shutdown: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    match interrupt.await {
        Ok(()) => {
            info!("Interrupt received, shutting down");
            shutdown.cancel();
        }
        Err(e) => warn!("Unable to listen for interrupt, polling continues: {}", e),
    }
}

async fn setup() -> Result<AppConfig> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;

    let config = AppConfig::load().await?;
    setup_logging_env(config.max_level()?);
    info!("Loaded configuration: {:?}", config);
    Ok(config)
}

fn setup_logging_env(level: Level) {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
