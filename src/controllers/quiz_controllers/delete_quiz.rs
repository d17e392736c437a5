use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    response::ApiResponse,
};

pub async fn delete_quiz(
    Path(quiz_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !state.quizzes.delete_quiz(&quiz_id).await? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    info!(quiz_id = %quiz_id, "Quiz deleted");

    Ok(Json(ApiResponse::empty()))
}
