use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use tracing::info;

use crate::controllers::survey_controllers::models::CreateSurveyRequest;
use crate::models::survey_models::Survey;
use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    response::ApiResponse,
};

pub async fn create_survey(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateSurveyRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Survey>>)> {
    payload.validate()?;

    let survey = payload.into_survey(Utc::now());
    let saved = state.store.create_survey(survey).await?;

    info!(survey_id = %saved.id, questions = saved.question_count, "Survey created");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(saved))))
}
