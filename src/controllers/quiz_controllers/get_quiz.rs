use axum::{
    extract::{Path, State},
    Json,
};

use crate::controllers::quiz_controllers::{models::QuizDetail, scoring::load_quiz};
use crate::state::AppState;
use crate::utils::{error::AppResult, response::ApiResponse};

/// Participant view of a quiz. Answer keys stay on the server.
pub async fn get_quiz(
    Path(quiz_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<QuizDetail>>> {
    let quiz = load_quiz(&state, &quiz_id).await?;
    let questions = state.quizzes.list_quiz_questions(&quiz.id).await?;

    Ok(Json(ApiResponse::ok(
        QuizDetail { quiz, questions }.without_answers(),
    )))
}
