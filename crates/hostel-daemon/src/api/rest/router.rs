//! API Router configuration

use super::handlers;
use super::state::AppState;
use crate::config::ServerConfig;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let api_routes = Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::daemon_status))
        // Facilities
        .route("/hostels", get(handlers::list_hostels))
        .route("/hostels/:id", get(handlers::get_hostel))
        .route("/hostels/:id/floors", get(handlers::list_floors))
        // Floors
        .route("/hostels/:id/floors/:floor", get(handlers::get_floor_snapshot))
        .route("/hostels/:id/floors/:floor/layout", get(handlers::get_floor_layout))
        .route("/hostels/:id/floors/:floor/view", get(handlers::get_floor_view))
        // Rooms
        .route("/hostels/:id/floors/:floor/rooms/:room", get(handlers::get_room))
        .route(
            "/hostels/:id/floors/:floor/rooms/:room/occupants",
            post(handlers::check_in),
        )
        .route(
            "/hostels/:id/floors/:floor/rooms/:room/occupants/:student_id",
            delete(handlers::check_out),
        )
        .route(
            "/hostels/:id/floors/:floor/rooms/:room/status",
            put(handlers::set_room_status),
        )
        .route(
            "/hostels/:id/floors/:floor/rooms/:room/history",
            get(handlers::room_history),
        )
        // Students
        .route("/students", get(handlers::list_students))
        .route("/students/:student_id", get(handlers::get_student))
        // Sheet webhook
        .route("/sheets-webhook", post(handlers::receive_sheet_webhook))
        .route("/sheets-webhook/health", get(handlers::webhook_health))
        // Events
        .route("/events", get(handlers::get_events))
        .route("/events/stream", get(handlers::stream_events));

    // Build router with middleware
    let router = Router::new()
        .nest("/api/v1", api_routes)
        .layer(DefaultBodyLimit::max(server.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(TraceLayer::new_for_http());

    let router = if server.enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebhookConfig;
    use crate::signature;
    use crate::storage::InMemoryStorage;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hostel_layout::LayoutRegistry;
    use hostel_types::{HistoryEntry, Room, RoomState, RoomStatus, StudentAssignment};
    use std::sync::Arc;
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    fn test_state(webhook: WebhookConfig) -> AppState {
        let registry = Arc::new(LayoutRegistry::builtin().unwrap());
        let (event_tx, _) = broadcast::channel(16);
        AppState::new(registry, Arc::new(InMemoryStorage::new()), event_tx, webhook)
    }

    fn test_router_with(state: AppState) -> Router {
        create_router(state, &ServerConfig::default())
    }

    fn test_router() -> Router {
        test_router_with(test_state(WebhookConfig {
            secret: Some(SECRET.to_string()),
            require_signature: true,
        }))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    fn webhook_req(body: &str, signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/sheets-webhook")
            .header("content-type", "application/json");
        if let Some(signature) = signature {
            builder = builder.header("X-Webhook-Signature", signature);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn sheet_row(action: &str, room: &str) -> String {
        serde_json::json!({
            "timestamp": "2024-07-01T09:30:00Z",
            "student_id": "STU10001",
            "student_name": "Asha Rao",
            "email": "asha@university.edu",
            "phone": "",
            "hostel_code": "g",
            "floor_number": 2,
            "room_label": room,
            "action": action
        })
        .to_string()
    }

    const ROOM_317: &str = "/api/v1/hostels/hostelG/floors/2/rooms/317";

    #[tokio::test]
    async fn health_returns_200() {
        let app = test_router();
        let (status, json) = send(&app, get_req("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn lists_hostels_and_floors() {
        let app = test_router();
        let (status, json) = send(&app, get_req("/api/v1/hostels")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 15);

        let (status, json) = send(&app, get_req("/api/v1/hostels/hostelG/floors")).await;
        assert_eq!(status, StatusCode::OK);
        let floors: Vec<u64> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["floorNumber"].as_u64().unwrap())
            .collect();
        assert_eq!(floors, vec![0, 2, 3]);
    }

    #[tokio::test]
    async fn unknown_facility_is_404() {
        let app = test_router();
        let (status, json) = send(&app, get_req("/api/v1/hostels/hostelZ/floors/2")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "NOT_FOUND");

        let (status, _) = send(&app, get_req("/api/v1/hostels/hostelA/floors/2/layout")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_floor_view_is_all_vacant() {
        let app = test_router();
        let (status, json) = send(&app, get_req("/api/v1/hostels/hostelG/floors/2/view")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stats"]["totalRooms"], 14);
        assert_eq!(json["stats"]["vacant"], 14);
        assert_eq!(json["stats"]["occupancyRate"], 0);

        let (_, snapshot) = send(&app, get_req("/api/v1/hostels/hostelG/floors/2")).await;
        assert_eq!(snapshot, serde_json::json!([]));
    }

    #[tokio::test]
    async fn check_in_then_out_updates_views() {
        let app = test_router();

        let (status, json) = send(
            &app,
            json_req(
                "POST",
                &format!("{}/occupants", ROOM_317),
                serde_json::json!({"studentId": "STU1", "name": "Asha", "course": "CSE", "year": 2}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let room: Room = serde_json::from_value(json).unwrap();
        assert_eq!(room.status, RoomStatus::Occupied);
        assert_eq!(room.capacity, 2);

        let (_, json) = send(&app, get_req("/api/v1/hostels/hostelG/floors/2")).await;
        let snapshot: Vec<RoomState> = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].room_id.as_str(), "317");

        let (_, json) = send(&app, get_req("/api/v1/hostels/hostelG/floors/2/view")).await;
        assert_eq!(json["stats"]["occupied"], 1);
        assert_eq!(json["stats"]["bedsInUse"], 1);

        let (status, json) = send(&app, get_req("/api/v1/students/STU1")).await;
        assert_eq!(status, StatusCode::OK);
        let assignment: StudentAssignment = serde_json::from_value(json).unwrap();
        assert_eq!(assignment.room_id.as_str(), "317");

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("{}/occupants/STU1", ROOM_317))
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "vacant");

        let (_, json) = send(&app, get_req(&format!("{}/history", ROOM_317))).await;
        let history: Vec<HistoryEntry> = serde_json::from_value(json).unwrap();
        let kinds: Vec<_> = history.iter().map(|h| h.change.kind()).collect();
        assert_eq!(kinds, vec!["checkin", "checkout"]);

        let (status, _) = send(&app, get_req("/api/v1/students/STU1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lists_and_searches_students() {
        let app = test_router();
        for (id, name, room) in [("S2", "Zara", "317"), ("S1", "Asha", "317"), ("S3", "Meera", "318")] {
            let (status, _) = send(
                &app,
                json_req(
                    "POST",
                    &format!("/api/v1/hostels/hostelG/floors/2/rooms/{}/occupants", room),
                    serde_json::json!({"studentId": id, "name": name}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, json) = send(&app, get_req("/api/v1/students")).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["occupant"]["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Asha", "Meera", "Zara"]);

        let (_, json) = send(&app, get_req("/api/v1/students?q=mee")).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["roomId"], "318");
        assert_eq!(json[0]["facility"], "hostelG");

        let (_, json) = send(&app, get_req("/api/v1/students?limit=1&offset=2")).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["occupant"]["studentId"], "S2");
    }

    #[tokio::test]
    async fn full_room_rejects_check_in() {
        let app = test_router();
        for (id, expected) in [
            ("S1", StatusCode::CREATED),
            ("S2", StatusCode::CREATED),
            ("S3", StatusCode::CONFLICT),
        ] {
            let (status, _) = send(
                &app,
                json_req(
                    "POST",
                    &format!("{}/occupants", ROOM_317),
                    serde_json::json!({"studentId": id, "name": "Student"}),
                ),
            )
            .await;
            assert_eq!(status, expected);
        }
    }

    #[tokio::test]
    async fn check_in_to_room_missing_from_layout_is_404() {
        let app = test_router();
        let (status, _) = send(
            &app,
            json_req(
                "POST",
                "/api/v1/hostels/hostelG/floors/2/rooms/B9/occupants",
                serde_json::json!({"studentId": "S1", "name": "X"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, get_req("/api/v1/hostels/hostelG/floors/2/rooms/lift")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reserve_and_release() {
        let app = test_router();
        let uri = "/api/v1/hostels/hostelG/floors/2/rooms/305/status";

        let (status, json) = send(&app, json_req("PUT", uri, serde_json::json!({"status": "reserved"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "reserved");

        let (status, _) = send(&app, json_req("PUT", uri, serde_json::json!({"status": "occupied"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = send(&app, json_req("PUT", uri, serde_json::json!({"status": "vacant"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "vacant");
    }

    #[tokio::test]
    async fn signed_webhook_checks_in_and_broadcasts() {
        let state = test_state(WebhookConfig {
            secret: Some(SECRET.to_string()),
            require_signature: true,
        });
        let mut events = state.event_tx.subscribe();
        let app = test_router_with(state);

        let body = sheet_row("checkin", "318");
        let signature = signature::sign(SECRET.as_bytes(), body.as_bytes());
        let (status, json) = send(&app, webhook_req(&body, Some(signature))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert_eq!(json["facility"], "hostelG");

        let event = events.recv().await.unwrap();
        assert_eq!(event.room_id.as_str(), "318");
        assert_eq!(event.actor.as_deref(), Some("webhook"));
        assert_eq!(event.occupant_count, 1);

        let (_, json) = send(&app, get_req("/api/v1/hostels/hostelG/floors/2/rooms/318")).await;
        let room: Room = serde_json::from_value(json).unwrap();
        assert_eq!(room.capacity, 2);
        assert_eq!(room.occupants[0].email.as_deref(), Some("asha@university.edu"));
        assert!(room.occupants[0].phone.is_none());

        let body = sheet_row("checkout", "318");
        let signature = signature::sign(SECRET.as_bytes(), body.as_bytes());
        let (status, _) = send(&app, webhook_req(&body, Some(signature))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn webhook_check_in_to_full_room_is_409() {
        let app = test_router();
        for id in ["S1", "S2"] {
            let (status, _) = send(
                &app,
                json_req(
                    "POST",
                    "/api/v1/hostels/hostelG/floors/2/rooms/318/occupants",
                    serde_json::json!({"studentId": id, "name": "Student"}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let body = sheet_row("checkin", "318");
        let signature = signature::sign(SECRET.as_bytes(), body.as_bytes());
        let (status, json) = send(&app, webhook_req(&body, Some(signature))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], "ROOM_FULL");
        assert_eq!(json["details"]["capacity"], 2);
    }

    #[tokio::test]
    async fn webhook_rejects_bad_signatures() {
        let app = test_router();
        let body = sheet_row("checkin", "318");

        let (status, _) = send(&app, webhook_req(&body, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let forged = signature::sign(b"wrong", body.as_bytes());
        let (status, json) = send(&app, webhook_req(&body, Some(forged))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "UNAUTHORIZED");

        let (_, json) = send(&app, get_req("/api/v1/hostels/hostelG/floors/2")).await;
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn webhook_without_secret_fails_closed() {
        let app = test_router_with(test_state(WebhookConfig::default()));
        let (status, _) = send(&app, webhook_req(&sheet_row("checkin", "318"), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn webhook_rejects_free_text_action() {
        let app = test_router_with(test_state(WebhookConfig {
            secret: None,
            require_signature: false,
        }));

        let (status, _) = send(&app, webhook_req(&sheet_row("Check-out", "318"), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = send(&app, webhook_req(&sheet_row("checkin", "999"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("999"));
    }

    #[tokio::test]
    async fn webhook_health_reports_ready() {
        let app = test_router();
        let (status, json) = send(&app, get_req("/api/v1/sheets-webhook/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ready");
        assert_eq!(json["signature_required"], true);
    }

    #[tokio::test]
    async fn recent_events_are_listed() {
        let app = test_router();
        send(
            &app,
            json_req(
                "POST",
                &format!("{}/occupants", ROOM_317),
                serde_json::json!({"studentId": "S1", "name": "X"}),
            ),
        )
        .await;

        let (status, json) = send(&app, get_req("/api/v1/events?facility=hostelG")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["change"]["type"], "checkin");
    }
}
