//! HTTP server hosting an application behind payload logging.
//!
//! # Responsibilities
//! - Wrap an application `Router` with the payload logging middleware
//! - Add request tracing and a request timeout
//! - Serve on a listener until shutdown is signalled

use std::time::Duration;

use axum::{middleware::from_fn_with_state, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::PayloadLoggingConfig;
use crate::error::PayloadResult;
use crate::http::middleware::{payload_logging_middleware, PayloadLogger};
use crate::lifecycle::{signals, Shutdown, ShutdownSignal};

/// Application server with payload logging applied to every route.
pub struct HttpServer {
    router: Router,
    config: PayloadLoggingConfig,
    logger: PayloadLogger,
}

impl HttpServer {
    /// Wrap `app` using a logger that reports to the configured collector.
    pub fn new(config: PayloadLoggingConfig, app: Router) -> PayloadResult<Self> {
        let logger = PayloadLogger::from_config(&config)?;
        Ok(Self::with_logger(config, app, logger))
    }

    /// Wrap `app` using an already built logger.
    pub fn with_logger(config: PayloadLoggingConfig, app: Router, logger: PayloadLogger) -> Self {
        let router = Self::build_router(&config, app, logger.clone());
        Self {
            router,
            config,
            logger,
        }
    }

    /// Layer order, outermost first: trace, payload logging, timeout, app.
    ///
    /// The timeout sits inside the logger so a timed-out exchange still gets
    /// its 408 Response entry.
    #[allow(deprecated)]
    fn build_router(config: &PayloadLoggingConfig, app: Router, logger: PayloadLogger) -> Router {
        app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn_with_state(logger, payload_logging_middleware))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// The fully layered router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &PayloadLoggingConfig {
        &self.config
    }

    pub fn logger(&self) -> &PayloadLogger {
        &self.logger
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            collector = %self.config.payload_logging_host,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run_until_terminated(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        tokio::spawn(async move {
            signals::wait_for_termination().await;
            shutdown.trigger();
        });

        self.run(listener, signal).await
    }
}
