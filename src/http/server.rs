//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create Axum Router with the gateway handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Resolve routes, build upstream URLs, run the multiplexer
//! - Assemble pages and map failures to error responses
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::assembly::{AssemblyOptions, ResponseBuilder};
use crate::config::{GatewayConfig, UpstreamConfig};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::{error_response, not_found};
use crate::http::upstream::UpstreamTarget;
use crate::multiplexer::{FetchResult, FetchSpec, HyperTransport, Transport};
use crate::observability::metrics;
use crate::routing::{Route, Router as GatewayRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<GatewayRouter>,
    pub target: Arc<UpstreamTarget>,
    pub upstream: Arc<UpstreamConfig>,
    pub assembly: Arc<AssemblyOptions>,
    pub transport: Arc<dyn Transport>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server that fetches through the default hyper transport.
    pub fn new(config: GatewayConfig) -> Result<Self, url::ParseError> {
        let transport = Arc::new(HyperTransport::from_config(&config.upstream));
        Self::with_transport(config, transport)
    }

    /// Create a server that fetches through `transport`.
    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn Transport>) -> Result<Self, url::ParseError> {
        let state = AppState {
            router: Arc::new(GatewayRouter::from_config(&config.routes)),
            target: Arc::new(UpstreamTarget::parse(&config.upstream.target)?),
            upstream: Arc::new(config.upstream.clone()),
            assembly: Arc::new(AssemblyOptions::from_config(&config.response)),
            transport,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The router, for serving in-process (e.g. with `tower::ServiceExt::oneshot`).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            upstream = %self.config.upstream.target,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Main gateway handler.
/// Looks up the route, fetches its layout and fragments, and renders the page.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, _body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();

    let Some(matched) = state.router.match_path(&path) else {
        tracing::info!(request_id = %request_id, path = %path, "Rendering 404");
        metrics::record_request(&method, 404, "none", start_time);
        return not_found();
    };
    let route_name = matched.route.pattern().as_str();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = %route_name,
        "Handling request"
    );

    let client = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let spec = state
        .target
        .bind(&matched)
        .iter()
        .fold(
            FetchSpec::from_config(&state.upstream, Arc::clone(&state.transport))
                .with_headers_from_request(&parts.headers, client),
            |spec, fragment| spec.with_bound_fragment(fragment),
        );

    let response = match spec.fetch_all().await {
        Ok(results) => render(&state.assembly, matched.route, &results),
        Err(error) => {
            tracing::error!(
                request_id = %request_id,
                path = %path,
                error = %error,
                "Fragment fetch failed"
            );
            error_response(&error)
        }
    };

    metrics::record_request(&method, response.status().as_u16(), route_name, start_time);
    response
}

fn render(options: &AssemblyOptions, route: &Route, results: &[FetchResult]) -> Response {
    for result in results {
        tracing::debug!(
            url = %result.url,
            elapsed_ms = result.duration.as_millis() as u64,
            "Fetched"
        );
    }

    let (layout, fragments) = match (route.layout(), results.split_first()) {
        (Some(_), Some((layout, fragments))) => (Some(layout), fragments),
        _ => (None, results),
    };

    ResponseBuilder::assemble(options, layout, fragments).into_response()
}
