//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding handler
//! - Wire up middleware (URI rewrite, tracing, timeout, request ID, limits)
//! - Forward rewritten requests to the storage origin
//! - Apply config reloads by swapping the routing state
//! - Stop on the shutdown signal

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::config::EdgeConfig;
use crate::error::EdgeError;
use crate::http::request::{origin_request, MakeRequestUuid, RequestIdExt};
use crate::http::response::client_response;
use crate::http::rewrite::rewrite_middleware;
use crate::observability::metrics;
use crate::routing::{EdgeRouter, Rewrite};

/// Everything derived from one configuration. Replaced whole on reload.
#[derive(Debug)]
pub struct InnerState {
    pub config: EdgeConfig,
    pub router: EdgeRouter,
    /// Base URL of the storage origin.
    pub origin: Url,
}

impl InnerState {
    pub fn new(config: EdgeConfig) -> Result<Self, EdgeError> {
        let origin = Url::parse(&format!("http://{}", config.origin.address))?;
        let router = EdgeRouter::new(&config.routing);
        Ok(Self {
            config,
            router,
            origin,
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<InnerState>>,
    pub client: Client<HttpConnector, Body>,
}

impl AppState {
    pub fn new(config: EdgeConfig) -> Result<Self, EdgeError> {
        let inner = InnerState::new(config)?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Self {
            inner: Arc::new(ArcSwap::from_pointee(inner)),
            client,
        })
    }

    /// Swap in a new configuration. In-flight requests keep the old one.
    pub fn reload(&self, config: EdgeConfig) -> Result<(), EdgeError> {
        let inner = InnerState::new(config)?;
        tracing::info!(
            origin = %inner.origin,
            production_dir = %inner.config.routing.production_dir,
            index_document = %inner.config.routing.index_document,
            "Configuration reloaded"
        );
        self.inner.store(Arc::new(inner));
        Ok(())
    }
}

/// HTTP server playing the edge node in front of the storage origin.
pub struct EdgeServer {
    router: Router,
    state: AppState,
}

impl EdgeServer {
    /// Create a new server with the given configuration.
    pub fn new(config: EdgeConfig) -> Result<Self, EdgeError> {
        let state = AppState::new(config)?;
        let router = Self::build_router(&state.inner.load().config, state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .layer(middleware::from_fn_with_state(state.clone(), rewrite_middleware))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(ConcurrencyLimitLayer::new(config.listener.max_connections))
    }

    /// Shared state, for the admin API and reloads.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The Axum router, for serving on a custom listener or in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configs received on `config_updates` replace the routing and origin
    /// settings; listener settings only take effect on restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<EdgeConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = state.reload(config) {
                    tracing::error!(error = %e, "Rejected configuration update");
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forward the (already rewritten) request to the origin.
async fn forward_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, EdgeError> {
    let start = Instant::now();
    let inner = state.inner.load_full();
    let method = request.method().to_string();
    let request_id = request.request_id().to_string();
    let path = request.uri().path().to_string();
    let (base_dir, kind) = request
        .extensions()
        .get::<Rewrite>()
        .map(|r| (r.base_dir.to_string(), r.kind.as_str()))
        .unwrap_or_default();

    let req = origin_request(request, &inner.origin, inner.config.origin.preserve_host)?;

    match state.client.request(req).await {
        Ok(response) => {
            let status = response.status();
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                base_dir = %base_dir,
                kind = kind,
                status = %status,
                "Origin responded"
            );
            metrics::record_request(&method, status.as_u16(), start);
            Ok(client_response(response))
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                path = %path,
                base_dir = %base_dir,
                kind = kind,
                error = %e,
                "Origin error"
            );
            metrics::record_request(&method, 502, start);
            Err(EdgeError::Origin(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, Uri};
    use tower::ServiceExt;

    /// Origin that answers every request with its own path and query.
    async fn start_echo_origin() -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(|uri: Uri| async move { uri.to_string() });
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        addr
    }

    async fn send(router: Router, host: &str, uri: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .uri(uri)
            .header("Host", host)
            .body(Body::empty())
            .unwrap();
        let res = router.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_router_forwards_rewritten_path() {
        let mut config = EdgeConfig::default();
        config.origin.address = start_echo_origin().await.to_string();
        let server = EdgeServer::new(config).unwrap();

        assert_eq!(
            send(server.router(), "acme.example.com", "/app.js").await,
            (StatusCode::OK, "/acme/app.js".to_string())
        );
        assert_eq!(
            send(server.router(), "a.b.example.com", "/dashboard").await,
            (StatusCode::OK, "/a/index.html".to_string())
        );
    }

    #[tokio::test]
    async fn test_reload_applies_to_router() {
        let mut config = EdgeConfig::default();
        config.origin.address = start_echo_origin().await.to_string();
        let server = EdgeServer::new(config.clone()).unwrap();

        config.routing.index_document = "200.html".into();
        server.state().reload(config).unwrap();

        assert_eq!(
            send(server.router(), "example.com", "/about").await.1,
            "/production/200.html"
        );
    }
}
