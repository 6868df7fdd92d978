//! Sheet webhook
//!
//! Receives one form submission per request from the sheet script and turns
//! it into a check-in or check-out. The signature is checked over the raw
//! body bytes before anything is parsed.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::signature::{self, SignatureCheck};
use crate::storage::{OccupancyStorage, RoomKey};
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use hostel_types::{RoomId, SheetAction, SheetRowPayload, DEFAULT_ROOM_CAPACITY, SIGNATURE_HEADER};
use serde::{Deserialize, Serialize};

/// Webhook acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: String,
    pub action: SheetAction,
    pub facility: String,
    pub floor: u32,
    pub room_id: String,
}

/// Webhook readiness
#[derive(Debug, Serialize)]
pub struct WebhookHealthResponse {
    pub status: String,
    pub message: String,
    pub signature_required: bool,
}

/// Readiness of the webhook endpoint
pub async fn webhook_health(State(state): State<AppState>) -> Json<WebhookHealthResponse> {
    Json(WebhookHealthResponse {
        status: "ready".to_string(),
        message: "Sheets webhook is operational".to_string(),
        signature_required: state.webhook.require_signature,
    })
}

/// Apply one form submission
pub async fn receive_sheet_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    authenticate(&state, &headers, &body)?;

    let payload: SheetRowPayload = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid submission: {}", e)))?;
    payload.validate()?;

    let entry = state
        .registry
        .facility_by_code(&payload.hostel_code)
        .ok_or_else(|| ApiError::NotFound(format!("Hostel {} not found", payload.hostel_code.trim())))?;
    let facility = entry.meta.id.clone();
    let node = entry
        .floor(payload.floor_number)
        .and_then(|layout| layout.room_by_label(&payload.room_label))
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Room {} on floor {} not found",
                payload.room_label.trim(),
                payload.floor_number
            ))
        })?;

    let key = RoomKey::new(facility, payload.floor_number, RoomId::new(node.id.clone()));
    let capacity = node.capacity.unwrap_or(DEFAULT_ROOM_CAPACITY);

    let change = match payload.action {
        SheetAction::Checkin => {
            state
                .storage
                .check_in(&key, capacity, payload.to_occupant())
                .await?
        }
        SheetAction::Checkout => state.storage.check_out(&key, &payload.student_id).await?,
    };
    state.publish(&key, &change, "webhook").await?;

    Ok(Json(WebhookResponse {
        status: "success".to_string(),
        action: payload.action,
        facility: key.facility.to_string(),
        floor: key.floor,
        room_id: key.room.to_string(),
    }))
}

fn authenticate(state: &AppState, headers: &HeaderMap, body: &[u8]) -> ApiResult<()> {
    let provided = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let Some(secret) = state.webhook.secret.as_deref() else {
        if state.webhook.require_signature {
            tracing::error!("Webhook signature required but no secret is configured");
            return Err(ApiError::Unauthorized(
                "webhook secret is not configured".to_string(),
            ));
        }
        return Ok(());
    };

    match signature::verify(secret.as_bytes(), body, provided) {
        SignatureCheck::Valid => Ok(()),
        SignatureCheck::Missing if !state.webhook.require_signature => Ok(()),
        check => {
            tracing::warn!(?check, "Rejected webhook submission");
            Err(ApiError::Unauthorized(format!("signature check failed: {:?}", check)))
        }
    }
}
