//! Axum route handlers for the Recommendation API.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::middleware::request_id::RequestId;
use crate::models::ids::{CareerGoalId, StudentId};
use crate::recommendation::engine::{
    recommend, recommend_for_student, validate_k, RecommendationResult,
};
use crate::recommendation::source::fetch_student;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// `k` is signed so negative values reach validation instead of failing
/// deserialisation.
#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default = "default_k")]
    pub k: i64,
    #[serde(default = "default_enforce_prereqs")]
    pub enforce_prereqs: bool,
}

impl RecommendationQuery {
    /// Requested result count; 422 when below 1.
    pub fn k(&self) -> Result<usize, AppError> {
        let k = usize::try_from(self.k).unwrap_or(0);
        validate_k(k)?;
        Ok(k)
    }
}

fn default_k() -> i64 {
    10
}

fn default_enforce_prereqs() -> bool {
    true
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/students/:student_id/recommendations
///
/// Recommends courses toward the career goal stored on the student record.
/// 400 when the student has no goal set, 404 when the student does not exist.
pub async fn handle_recommend_for_student(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(student_id): Path<i64>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> Result<Json<RecommendationResult>, AppError> {
    let Query(params) = query?;
    let k = params.k()?;

    let student = fetch_student(state.catalog.as_ref(), StudentId(student_id)).await?;
    let goal = student
        .career_goal_id
        .ok_or_else(|| AppError::Validation("Student has no career goal set".to_string()))?;

    tracing::info!(
        request_id = %request_id,
        student_id = %student.id,
        career_goal_id = %goal,
        k,
        enforce_prereqs = params.enforce_prereqs,
        "Processing recommendation request"
    );

    let result = recommend_for_student(
        state.catalog.as_ref(),
        student,
        goal,
        k,
        params.enforce_prereqs,
        &state.scoring,
    )
    .await?;

    Ok(Json(result))
}

/// GET /api/v1/students/:student_id/recommendations/goals/:career_goal_id
///
/// Recommends courses toward an explicit career goal. A goal with no stored
/// requirements is scored as "no requirements", not rejected.
pub async fn handle_recommend_for_goal(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((student_id, career_goal_id)): Path<(i64, i64)>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> Result<Json<RecommendationResult>, AppError> {
    let Query(params) = query?;
    let k = params.k()?;

    tracing::info!(
        request_id = %request_id,
        student_id,
        career_goal_id,
        k,
        enforce_prereqs = params.enforce_prereqs,
        "Processing goal recommendation request"
    );

    let result = recommend(
        state.catalog.as_ref(),
        StudentId(student_id),
        CareerGoalId(career_goal_id),
        k,
        params.enforce_prereqs,
        &state.scoring,
    )
    .await?;

    Ok(Json(result))
}
