//! Application state for API handlers

use crate::config::WebhookConfig;
use crate::error::ApiResult;
use crate::storage::{RoomChange, RoomKey, Storage};
use hostel_layout::LayoutRegistry;
use hostel_types::OccupancyEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Immutable floor layouts
    pub registry: Arc<LayoutRegistry>,

    /// Storage backend
    pub storage: Arc<dyn Storage>,

    /// Event broadcast channel
    pub event_tx: broadcast::Sender<OccupancyEvent>,

    /// Webhook signature settings
    pub webhook: Arc<WebhookConfig>,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        registry: Arc<LayoutRegistry>,
        storage: Arc<dyn Storage>,
        event_tx: broadcast::Sender<OccupancyEvent>,
        webhook: WebhookConfig,
    ) -> Self {
        Self {
            registry,
            storage,
            event_tx,
            webhook: Arc::new(webhook),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Record and broadcast the event for a room write.
    ///
    /// Writes that changed nothing publish nothing.
    pub async fn publish(&self, key: &RoomKey, change: &RoomChange, actor: &str) -> ApiResult<()> {
        let Some(entry) = &change.entry else {
            return Ok(());
        };

        let event = OccupancyEvent::new(
            key.facility.clone(),
            key.floor,
            key.room.clone(),
            entry,
            change.state.status,
            change.state.occupants.len(),
        )
        .with_actor(actor);

        tracing::info!(
            room = %key,
            change = entry.change.kind(),
            status = %change.state.status,
            actor,
            "Occupancy changed"
        );

        self.storage.store_event(event.clone()).await?;
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
        Ok(())
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }
}
