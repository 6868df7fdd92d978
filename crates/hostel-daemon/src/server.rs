//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use crate::storage::InMemoryStorage;
use hostel_layout::LayoutRegistry;
use hostel_types::OccupancyEvent;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Hostel occupancy daemon server
pub struct Server {
    config: DaemonConfig,
    registry: Arc<LayoutRegistry>,
    storage: Arc<InMemoryStorage>,
    event_tx: broadcast::Sender<OccupancyEvent>,
}

impl Server {
    /// Create a new server, loading the layout catalogs named in `config`
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let registry = LayoutRegistry::load(config.layouts.include_builtin, &config.layouts.catalogs)?;
        if registry.is_empty() {
            return Err(DaemonError::Config(
                "no facilities loaded; enable the built-in catalog or name a catalog file".to_string(),
            ));
        }
        tracing::info!(
            facilities = registry.facility_count(),
            floors = registry.floor_count(),
            "Layout registry ready"
        );

        if config.webhook.require_signature && config.webhook.secret.is_none() {
            tracing::warn!("Webhook signatures are required but no secret is set; submissions will be rejected");
        }

        let (event_tx, _) = broadcast::channel(config.server.event_buffer.max(1));

        Ok(Self {
            config,
            registry: Arc::new(registry),
            storage: Arc::new(InMemoryStorage::new()),
            event_tx,
        })
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(
            self.registry.clone(),
            self.storage.clone(),
            self.event_tx.clone(),
            self.config.webhook.clone(),
        );

        let app = create_router(state, &self.config.server);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Hostel daemon listening on {}", addr);

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Hostel daemon shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
