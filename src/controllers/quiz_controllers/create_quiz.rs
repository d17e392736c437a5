use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use tracing::info;

use crate::controllers::quiz_controllers::models::{CreateQuizRequest, QuizDetail};
use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    response::ApiResponse,
};

pub async fn create_quiz(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateQuizRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<QuizDetail>>)> {
    payload.validate()?;

    let survey = state
        .store
        .get_survey(&payload.survey_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Survey not found".to_string()))?;

    let (quiz, questions) = payload.into_quiz(&survey, Utc::now())?;
    let quiz = state.quizzes.create_quiz(quiz).await?;

    let mut saved = Vec::with_capacity(questions.len());
    for question in questions {
        saved.push(state.quizzes.add_quiz_question(question).await?);
    }

    info!(quiz_id = %quiz.id, survey_id = %quiz.survey_id, questions = saved.len(), "Quiz created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(QuizDetail {
            quiz,
            questions: saved,
        })),
    ))
}
