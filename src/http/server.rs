//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router for one service
//! - Wire up middleware (HTTP tracing, request ID, timeout backstop, metrics)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ServiceConfig, ServiceRole};
use crate::observability::metrics;
use crate::services::{entry, resolution, EntryState, ResolutionState, ServiceError};
use crate::trace::Tracer;

/// Slack between the handler's own deadline and the hard timeout.
const TIMEOUT_GRACE: Duration = Duration::from_secs(1);

/// HTTP server for one of the two services.
pub struct HttpServer {
    router: Router,
    role: ServiceRole,
}

impl HttpServer {
    /// Build the server for `role`.
    ///
    /// `metrics` adds a `/metrics` route rendering the given recorder.
    pub fn new(
        role: ServiceRole,
        config: &ServiceConfig,
        tracer: Tracer,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, ServiceError> {
        let mut routes = match role {
            ServiceRole::Entry => entry::routes(EntryState::from_config(config, tracer)?),
            ServiceRole::Resolution => {
                resolution::routes(ResolutionState::from_config(config, tracer)?)
            }
        };
        if let Some(handle) = metrics {
            routes = routes.merge(
                Router::new()
                    .route("/metrics", get(metrics::render))
                    .with_state(handle),
            );
        }

        let budget = Duration::from_secs(config.timeouts.request_secs);
        Ok(Self {
            router: Self::with_layers(routes, role, budget),
            role,
        })
    }

    /// Wrap the routes with all middleware layers.
    fn with_layers(routes: Router, role: ServiceRole, budget: Duration) -> Router {
        routes
            .layer(middleware::from_fn_with_state(
                role.as_str(),
                metrics::track_requests,
            ))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                budget + TIMEOUT_GRACE,
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            service = %self.role,
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!(service = %self.role, "HTTP server stopped");
        Ok(())
    }
}
