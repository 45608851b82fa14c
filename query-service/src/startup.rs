//! Application startup and lifecycle management.

use axum::{body::Body, extract::DefaultBodyLimit, middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    handle_panic, make_request_span, metrics_middleware, request_id_middleware,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::QueryServiceConfig;
use crate::handlers::{
    fallback, health_check, metrics_endpoint, query_get, query_post, readiness_check,
};

/// Build the service router. Handlers are stateless, so the router is too.
pub fn build_router() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        // `text` has no upper bound, so the body is not size-capped.
        .route(
            "/query",
            get(query_get)
                .post(query_post)
                .layer(DefaultBodyLimit::disable()),
        )
        .fallback(fallback)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        // Outside the trace layer so the span sees the assigned request id.
        .layer(from_fn(request_id_middleware))
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Bind the listener described by `config` (port 0 = random port for testing).
    pub async fn build(config: QueryServiceConfig) -> Result<Self, AppError> {
        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Query service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM, then drain in-flight requests.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
