use axum::{
    extract::{Path, State},
    Json,
};

use crate::controllers::quiz_controllers::scoring::load_quiz;
use crate::state::AppState;
use crate::utils::{
    error::AppResult,
    grading::{quiz_analytics, QuizAnalytics},
    response::ApiResponse,
};

pub async fn get_analytics(
    Path(quiz_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<QuizAnalytics>>> {
    let quiz = load_quiz(&state, &quiz_id).await?;
    let attempts = state.quizzes.list_attempts(&quiz.id, None).await?;

    Ok(Json(ApiResponse::ok(quiz_analytics(&attempts))))
}
