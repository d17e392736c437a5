use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::controllers::quiz_controllers::{
    models::{CreateSpecialSurveyRequest, SurveyAccess},
    scoring::load_quiz,
};
use crate::models::quiz_models::SpecialSurvey;
use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    response::ApiResponse,
};

/// Gates an existing survey behind a quiz's whitelist.
pub async fn create_special_survey(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateSpecialSurveyRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<SpecialSurvey>>)> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Special survey title is required".to_string(),
        ));
    }

    let survey = state
        .store
        .get_survey(&payload.survey_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Survey not found".to_string()))?;
    let quiz = load_quiz(&state, &payload.quiz_id).await?;

    let special = state
        .quizzes
        .create_special_survey(SpecialSurvey {
            id: Uuid::new_v4().to_string(),
            survey_id: survey.id,
            quiz_id: quiz.id,
            title: payload.title,
            description: payload.description,
            is_active: true,
            created_at: Utc::now(),
        })
        .await?;

    info!(special_survey_id = %special.id, quiz_id = %special.quiz_id, "Special survey created");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(special))))
}

pub async fn list_special_surveys(
    Path(quiz_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<SpecialSurvey>>>> {
    let quiz = load_quiz(&state, &quiz_id).await?;
    let surveys = state.quizzes.list_special_surveys(&quiz.id).await?;

    Ok(Json(ApiResponse::ok(surveys)))
}

/// Whether `wallet` holds a current whitelist entry for the gating quiz.
pub async fn check_access(
    Path((special_survey_id, wallet)): Path<(String, String)>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SurveyAccess>>> {
    let special = state
        .quizzes
        .get_special_survey(&special_survey_id)
        .await?
        .filter(|special| special.is_active)
        .ok_or_else(|| AppError::NotFound("Special survey not found".to_string()))?;

    let now = Utc::now();
    let access = state
        .quizzes
        .get_whitelist_entry(&special.quiz_id, &wallet)
        .await?
        .map_or(false, |entry| entry.is_current(now));

    Ok(Json(ApiResponse::ok(SurveyAccess {
        special_survey_id: special.id,
        wallet_address: wallet,
        access,
    })))
}
