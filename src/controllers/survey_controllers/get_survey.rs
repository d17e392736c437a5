use axum::{
    extract::{Path, State},
    Json,
};

use crate::models::survey_models::Survey;
use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    response::ApiResponse,
};

pub async fn get_survey(
    Path(survey_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Survey>>> {
    let survey = state
        .store
        .get_survey(&survey_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Survey not found".to_string()))?;

    Ok(Json(ApiResponse::ok(survey)))
}
