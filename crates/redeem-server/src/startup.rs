//! Server startup and graceful shutdown.

use crate::di::AppModule;
use redeem_config::AppConfig;
use redeem_core::{RedeemError, RedeemResult};
use metrics_exporter_prometheus::PrometheusHandle;
use redeem_rest::create_router;
use redeem_rest::metrics::{install_recorder, metrics_router};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// How often histogram buckets of the recorder are drained.
const METRICS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let addr = config.server.addr();
    info!("{}", separator);
    info!("{} v{} ({})", config.app.name, config.app.version, config.app.environment);
    info!("REST API:  http://{}", addr);
    info!("Health:    http://{}/ready", addr);
    info!("API Docs:  http://{}/api-docs/openapi.json", addr);
    if config.observability.metrics_enabled {
        info!(
            "Metrics:   http://{}/metrics",
            config.observability.metrics_addr(&config.server)
        );
    }
    info!("Wallet:    {}", config.wallet.endpoint);
    info!("{}", separator);
}

/// Serves the REST API until `shutdown` is cancelled, then drains in-flight
/// requests and closes the database pool.
pub async fn serve(
    module: AppModule,
    config: &AppConfig,
    shutdown: CancellationToken,
) -> RedeemResult<()> {
    let state = module.app_state().with_shutdown(shutdown.clone());
    let router = create_router(state, &config.server);

    let listener = bind(&config.server.addr()).await?;

    let metrics = if config.observability.metrics_enabled {
        let handle = install_recorder()?;
        let metrics_listener = bind(&config.observability.metrics_addr(&config.server)).await?;
        Some(tokio::spawn(serve_metrics(
            metrics_listener,
            handle,
            shutdown.clone(),
        )))
    } else {
        None
    };

    print_startup_info(config);

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await
        .map_err(|e| RedeemError::Internal(format!("REST server error: {}", e)));

    shutdown.cancel();
    if let Some(task) = metrics {
        if let Err(e) = task.await {
            error!("Metrics server task failed: {}", e);
        }
    }

    module.db_pool().close().await;
    info!("Server shutdown complete");
    result
}

async fn bind(addr: &str) -> RedeemResult<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| RedeemError::Internal(format!("Failed to bind {}: {}", addr, e)))
}

/// Serves the Prometheus scrape endpoint until `shutdown` is cancelled.
///
/// A failing metrics listener takes the whole server down with it.
pub async fn serve_metrics(
    listener: TcpListener,
    handle: PrometheusHandle,
    shutdown: CancellationToken,
) {
    let upkeep = {
        let handle = handle.clone();
        let shutdown = shutdown.clone();
        async move {
            let mut interval = tokio::time::interval(METRICS_UPKEEP_INTERVAL);
            loop {
                tokio::select! {
                    _ = interval.tick() => handle.run_upkeep(),
                    () = shutdown.cancelled() => break,
                }
            }
        }
    };

    let server = async {
        axum::serve(listener, metrics_router(handle))
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .await
    };

    let (result, ()) = tokio::join!(server, upkeep);
    if let Err(e) = result {
        error!("Metrics server error: {}", e);
        shutdown.cancel();
    }
    info!("Metrics server stopped");
}

/// Cancels `shutdown` on Ctrl+C or SIGTERM.
pub async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
        () = shutdown.cancelled() => {}
    }

    shutdown.cancel();
}
