//! # Redeem Server
//!
//! Entry point: loads configuration, initializes telemetry, wires the
//! application and serves HTTP until Ctrl+C or SIGTERM.

use redeem_config::ConfigLoader;
use redeem_core::telemetry::{init_telemetry, shutdown_telemetry};
use redeem_core::RedeemResult;
use redeem_server::{
    di::AppModule,
    startup::{serve, shutdown_signal},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("Application error: {e}");
        shutdown_telemetry();
        std::process::exit(1);
    }
    shutdown_telemetry();
}

async fn run() -> RedeemResult<()> {
    let config = ConfigLoader::from_default_location()?.get().await;
    init_telemetry(&config.observability.telemetry(&config.app.name))?;

    info!("Starting {} v{}", config.app.name, env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let module = AppModule::build(&config).await?;

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    serve(module, &config, shutdown).await
}
