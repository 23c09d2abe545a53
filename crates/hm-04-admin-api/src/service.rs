//! Admin API server.

use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

use crate::domain::{ApiConfig, ConfigError};
use crate::handlers::AppState;
use crate::ports::IdentityResolver;
use crate::router::build_router;

/// Owns the configured router and serves it.
pub struct AdminApiServer {
    config: ApiConfig,
    router: Router,
}

impl AdminApiServer {
    pub fn new(
        config: ApiConfig,
        state: AppState,
        identity: Arc<dyn IdentityResolver>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let router = build_router(state, identity, &config);
        Ok(Self { config, router })
    }

    /// The router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "Admin API listening");
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Admin API stopped");
        Ok(())
    }
}
