use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use tracing::info;

use crate::controllers::quiz_controllers::{
    models::{require_wallet, GradeOutcome, GradeResponseRequest},
    scoring::{load_attempt, load_quiz, settle_attempt},
};
use crate::models::quiz_models::AttemptStatus;
use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    response::ApiResponse,
};

/// Manually grades one answer, then rescores its attempt.
pub async fn grade_response(
    Path((quiz_id, response_id)): Path<(String, String)>,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<GradeResponseRequest>, AppError>,
) -> AppResult<Json<ApiResponse<GradeOutcome>>> {
    if let Some(grader) = &payload.graded_by {
        require_wallet(grader)?;
    }

    let quiz = load_quiz(&state, &quiz_id).await?;
    let mut response = state
        .quizzes
        .get_quiz_response(&response_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Response not found".to_string()))?;
    let attempt = load_attempt(&state, &quiz.id, &response.attempt_id).await?;

    if attempt.status == AttemptStatus::InProgress {
        return Err(AppError::BadRequest(
            "Attempt has not been submitted yet".to_string(),
        ));
    }

    let question = state
        .quizzes
        .list_quiz_questions(&quiz.id)
        .await?
        .into_iter()
        .find(|q| q.id == response.question_id)
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    if !(0.0..=question.points).contains(&payload.points_awarded) {
        return Err(AppError::BadRequest(format!(
            "points_awarded must be between 0 and {}",
            question.points
        )));
    }

    let now = Utc::now();
    response.points_awarded = payload.points_awarded;
    response.is_correct = Some(payload.points_awarded >= question.points);
    response.is_graded = true;
    response.graded_by = payload.graded_by;
    response.graded_at = Some(now);
    response.feedback = payload.feedback;
    let response = state.quizzes.update_quiz_response(response).await?;

    let attempt = settle_attempt(&state, &quiz, attempt, now).await?;

    info!(
        response_id = %response.id,
        points = response.points_awarded,
        attempt_status = ?attempt.status,
        "Response graded"
    );

    Ok(Json(ApiResponse::ok(GradeOutcome { response, attempt })))
}
