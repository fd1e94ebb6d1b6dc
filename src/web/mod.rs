//! Web server module.

mod handlers;

pub use handlers::*;

use crate::config::ServerConfig;
use crate::registry::HostRepository;
use crate::status::StatusAggregator;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub hosts: Arc<HostRepository>,
    pub status: Arc<StatusAggregator>,
}

/// Web server for the host dashboard API.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(
        config: ServerConfig,
        hosts: Arc<HostRepository>,
        status: Arc<StatusAggregator>,
    ) -> Self {
        Self {
            state: AppState {
                config,
                hosts,
                status,
            },
        }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let mut router = Router::new()
            .route("/api/status", get(handlers::handle_status))
            .route("/api/health", get(handlers::handle_health))
            .route(
                "/api/hosts",
                get(handlers::handle_get_hosts).post(handlers::handle_create_host),
            )
            .route(
                "/api/hosts/{ip}",
                get(handlers::handle_get_host)
                    .put(handlers::handle_update_host)
                    .delete(handlers::handle_delete_host),
            );

        // Dashboard pages are static assets maintained outside this crate.
        if let Some(dir) = &self.state.config.ui_dir {
            router = router.fallback_service(ServeDir::new(dir));
        }

        router
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("Dashboard listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
