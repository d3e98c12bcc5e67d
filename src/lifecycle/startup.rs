//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging, metrics and the tracer in dependency order
//! - Bind the listener and begin accepting traffic
//! - Flush buffered spans once the server has drained
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last (traffic only when ready)

use std::path::Path;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, ServiceRole};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics};
use crate::services::ServiceError;
use crate::trace::{otlp_provider, Tracer};

/// Fatal error before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("cannot build span exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run one service until SIGINT or SIGTERM.
pub async fn run_service(role: ServiceRole, config_path: Option<&Path>) -> Result<(), StartupError> {
    let config = load_config(role, config_path)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        service = %role,
        service_name = %config.telemetry.service_name,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let metrics = if config.observability.metrics_enabled {
        Some(metrics::init_metrics()?)
    } else {
        None
    };

    let provider = otlp_provider(&config.telemetry)?;
    let server = HttpServer::new(role, &config, Tracer::from_provider(&provider), metrics)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let served = server.run(listener, receiver).await;

    // The OTLP exporter blocks on its HTTP client.
    match tokio::task::spawn_blocking(move || provider.shutdown()).await {
        Ok(Ok(())) => tracing::info!("Span exporter flushed"),
        Ok(Err(e)) => tracing::warn!(error = %e, "Span exporter flush failed"),
        Err(e) => tracing::warn!(error = %e, "Span exporter flush task failed"),
    }

    served?;
    tracing::info!(service = %role, "Shutdown complete");
    Ok(())
}
