//! Event streaming handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use crate::storage::EventStorage;
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::stream::{self, Stream};
use hostel_types::{FacilityId, OccupancyEvent};
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;

/// Get events query params
#[derive(Debug, Deserialize)]
pub struct GetEventsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub facility: Option<String>,
}

fn default_limit() -> usize {
    20
}

/// Get recent events
pub async fn get_events(
    State(state): State<AppState>,
    Query(query): Query<GetEventsQuery>,
) -> ApiResult<Json<Vec<OccupancyEvent>>> {
    let events = match query.facility {
        Some(facility) => {
            state
                .storage
                .get_events_for_facility(&FacilityId::new(facility), query.limit)
                .await?
        }
        None => state.storage.get_recent_events(query.limit).await?,
    };

    Ok(Json(events))
}

/// Stream events via SSE
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_tx.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        match rx.recv().await {
            Ok(event) => {
                let json = serde_json::to_string(&event).unwrap_or_default();
                let sse_event = Event::default().event("occupancy_changed").data(json);
                Some((Ok(sse_event), rx))
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Event stream subscriber lagged");
                Some((Ok(Event::default().comment("lagged")), rx))
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => None,
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
