//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all submission routes
//! - Wire up middleware (request ID, tracing, panic catch, timeout,
//!   body limit, rate limiting)
//! - Construct the notifier from validated credentials
//! - Bind the server to a listener and drain it on shutdown

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::shutdown;
use crate::notify::Notifier;
use crate::security::rate_limit::{rate_limit_middleware, RateLimitPolicy, RateLimiter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    /// `None` until messaging credentials are configured; submission
    /// handlers answer with a configuration error in that case.
    pub notifier: Option<Arc<Notifier>>,
}

/// HTTP server for the lead gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    ///
    /// Credentials are resolved here, once; their absence is logged
    /// eagerly instead of surfacing per request.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let notifier = match config.messaging.credentials() {
            Some(credentials) => Some(Arc::new(Notifier::new(
                credentials,
                &config.messaging.api_base,
                Duration::from_secs(config.timeouts.notify_secs),
            )?)),
            None => {
                tracing::warn!(
                    "Messaging credentials not configured; submission endpoints will answer 500"
                );
                None
            }
        };

        let state = AppState {
            config: Arc::new(config.clone()),
            notifier,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        // The primary submission route carries its own, stricter policy
        // on top of the general one.
        let mut submit = Router::new().route("/submit-application", post(handlers::submit_application));
        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiter::new(RateLimitPolicy::submission(
                &config.rate_limit.submission,
            )));
            submit = submit.route_layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        }

        let mut api = Router::new()
            .route("/request-callback", post(handlers::request_callback))
            .route("/request-ngn-callback", post(handlers::request_ngn_callback))
            .route("/request-wimax", post(handlers::request_wimax))
            .route(
                "/submit-connection-request",
                post(handlers::submit_connection_request),
            )
            .merge(submit);
        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiter::new(RateLimitPolicy::general(
                &config.rate_limit.general,
            )));
            api = api.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        Router::new()
            .nest("/api", api)
            .route("/health", get(handlers::health))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TraceLayer::new_for_http())
                    .layer(CatchPanicLayer::custom(handle_panic))
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Map a panicking handler to the generic 500 body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Internal server error" })),
    )
        .into_response()
}
