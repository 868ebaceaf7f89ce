//! Parley - Main Entry Point
//!
//! Wires the authentication coordinator to the simulated identity SDK and
//! the configured code exchange, then hands control to the console
//! presenter.

mod presenter;

use std::path::PathBuf;
use std::sync::Arc;

use parley_application::{AuthCoordinator, IdentitySdk};
use parley_infrastructure::{AppConfig, SimulatedIdentitySdk, SystemClock};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::presenter::Presenter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they do not interleave with the prompt
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        exchange = ?config.exchange.mode,
        "starting Parley"
    );

    let sdk = Arc::new(SimulatedIdentitySdk::new());
    let exchange = config.exchange.build(Arc::new(SystemClock::new()))?;
    let coordinator = Arc::new(AuthCoordinator::new(
        Arc::clone(&sdk) as Arc<dyn IdentitySdk>,
        exchange,
        config.coordinator_config(),
    ));

    let listener = coordinator.start().await;
    Presenter::new(coordinator, sdk).run().await?;
    listener.abort();

    Ok(())
}
