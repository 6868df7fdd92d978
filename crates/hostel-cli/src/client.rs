//! HTTP client for the hostel daemon

use crate::error::{CliError, CliResult};
use hostel_types::{
    FacilityId, FacilityKind, HistoryEntry, Occupant, Room, RoomState, RoomStatus,
    SheetAction, StudentAssignment, SIGNATURE_HEADER,
};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// HTTP client for communicating with the hostel daemon
pub struct HostelClient {
    client: Client,
    base_url: String,
}

/// Daemon health response
#[derive(Debug, Deserialize, Serialize)]
pub struct DaemonHealth {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// Daemon status response
#[derive(Debug, Deserialize, Serialize)]
pub struct DaemonStatus {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub stats: DaemonStats,
}

/// Daemon counters
#[derive(Debug, Deserialize, Serialize)]
pub struct DaemonStats {
    pub facilities: usize,
    pub floors: usize,
    pub rooms_tracked: usize,
    pub occupied_rooms: usize,
    pub reserved_rooms: usize,
    pub occupants: usize,
    pub event_subscribers: usize,
}

/// Facility as listed by the daemon
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelInfo {
    pub id: FacilityId,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FacilityKind,
    pub floor_count: usize,
}

/// Floor as listed by the daemon
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorInfo {
    pub floor_number: u32,
    pub room_count: usize,
}

/// Webhook acknowledgement
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookAck {
    pub status: String,
    pub action: SheetAction,
    pub facility: String,
    pub floor: u32,
    pub room_id: String,
}

/// Error body returned by the daemon
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Check-in request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckInRequest<'a> {
    student_id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    course: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

impl HostelClient {
    /// Create a new client
    pub fn new(endpoint: &str, timeout: std::time::Duration) -> CliResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Check daemon health
    pub async fn health_check(&self) -> CliResult<DaemonHealth> {
        self.get("/api/v1/health").await
    }

    /// Daemon status and counters
    pub async fn status(&self) -> CliResult<DaemonStatus> {
        self.get("/api/v1/status").await
    }

    // ========== Facility API ==========

    pub async fn list_hostels(&self) -> CliResult<Vec<HostelInfo>> {
        self.get("/api/v1/hostels").await
    }

    pub async fn list_floors(&self, hostel: &str) -> CliResult<Vec<FloorInfo>> {
        self.get(&format!("/api/v1/hostels/{}/floors", hostel)).await
    }

    /// Live occupancy of one floor. Any malformed record rejects the whole snapshot.
    pub async fn floor_snapshot(&self, hostel: &str, floor: u32) -> CliResult<Vec<RoomState>> {
        let states = self
            .get(&format!("/api/v1/hostels/{}/floors/{}", hostel, floor))
            .await?;
        validate_snapshot(states)
    }

    // ========== Room API ==========

    pub async fn get_room(&self, hostel: &str, floor: u32, room: &str) -> CliResult<Room> {
        self.get(&self.room_path(hostel, floor, room)).await
    }

    pub async fn check_in(
        &self,
        hostel: &str,
        floor: u32,
        room: &str,
        occupant: &Occupant,
    ) -> CliResult<Room> {
        let request = CheckInRequest {
            student_id: occupant.student_id.as_str(),
            name: &occupant.name,
            course: occupant.course.as_deref(),
            year: occupant.year,
            email: occupant.email.as_deref(),
            phone: occupant.phone.as_deref(),
        };
        self.post(
            &format!("{}/occupants", self.room_path(hostel, floor, room)),
            &request,
        )
        .await
    }

    pub async fn check_out(
        &self,
        hostel: &str,
        floor: u32,
        room: &str,
        student_id: &str,
    ) -> CliResult<Room> {
        self.delete(&format!(
            "{}/occupants/{}",
            self.room_path(hostel, floor, room),
            student_id
        ))
        .await
    }

    /// Reserve a room, or release it back to vacant
    pub async fn set_status(
        &self,
        hostel: &str,
        floor: u32,
        room: &str,
        status: RoomStatus,
    ) -> CliResult<Room> {
        self.put(
            &format!("{}/status", self.room_path(hostel, floor, room)),
            &serde_json::json!({ "status": status }),
        )
        .await
    }

    pub async fn room_history(
        &self,
        hostel: &str,
        floor: u32,
        room: &str,
        limit: usize,
    ) -> CliResult<Vec<HistoryEntry>> {
        self.get(&format!(
            "{}/history?limit={}",
            self.room_path(hostel, floor, room),
            limit
        ))
        .await
    }

    // ========== Student API ==========

    pub async fn find_student(&self, student_id: &str) -> CliResult<StudentAssignment> {
        self.get(&format!("/api/v1/students/{}", student_id)).await
    }

    /// Students with an active assignment, optionally filtered
    pub async fn list_students(
        &self,
        query: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> CliResult<Vec<StudentAssignment>> {
        let url = format!("{}/api/v1/students", self.base_url);
        let mut params = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
        if let Some(query) = query {
            params.push(("q", query.to_string()));
        }
        let response = self.client.get(&url).query(&params).send().await?;
        self.handle_response(response).await
    }

    // ========== Webhook API ==========

    /// Post a raw webhook body, signed when a signature is given
    pub async fn send_webhook(&self, body: Vec<u8>, signature: Option<&str>) -> CliResult<WebhookAck> {
        let url = format!("{}/api/v1/sheets-webhook", self.base_url);
        let mut request = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(signature) = signature {
            request = request.header(SIGNATURE_HEADER, signature);
        }
        let response = request.send().await?;
        self.handle_response(response).await
    }

    // ========== Internal HTTP helpers ==========

    fn room_path(&self, hostel: &str, floor: u32, room: &str) -> String {
        format!("/api/v1/hostels/{}/floors/{}/rooms/{}", hostel, floor, room)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> CliResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> CliResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> CliResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.put(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> CliResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.delete(&url).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> CliResult<T> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text);
        if status == StatusCode::NOT_FOUND {
            Err(CliError::NotFound(message))
        } else {
            Err(CliError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

pub(crate) fn validate_snapshot(states: Vec<RoomState>) -> CliResult<Vec<RoomState>> {
    for state in &states {
        state
            .validate()
            .map_err(|e| CliError::InvalidResponse(format!("room {}: {}", state.room_id, e)))?;
    }
    Ok(states)
}

/// Pull the `error` field out of a daemon error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}
