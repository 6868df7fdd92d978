//! Student lookup and listing

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::OccupancyStorage;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use hostel_types::{StudentAssignment, StudentId};
use serde::Deserialize;

/// List students query params
#[derive(Debug, Deserialize)]
pub struct ListStudentsQuery {
    /// Matches name, email or student id
    pub q: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Students with an active assignment, ordered by name
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<ListStudentsQuery>,
) -> ApiResult<Json<Vec<StudentAssignment>>> {
    let students = state
        .storage
        .list_students(query.q.as_deref(), query.limit, query.offset)
        .await?;
    Ok(Json(students))
}

/// Current room of a student
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> ApiResult<Json<StudentAssignment>> {
    let student_id = StudentId::new(student_id);
    state
        .storage
        .find_student(&student_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Student {} has no active assignment", student_id)))
}
