use axum::{
    extract::{Path, State},
    Json,
};

use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    response::ApiResponse,
    stats::{survey_stats, SurveyStats},
};

pub async fn get_stats(
    Path(survey_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SurveyStats>>> {
    let survey = state
        .store
        .get_survey(&survey_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Survey not found".to_string()))?;

    // Responses are keyed by whichever id the client submitted under.
    let mut responses = state.store.list_responses(&survey.id).await?;
    if survey.public_id != survey.id {
        responses.extend(state.store.list_responses(&survey.public_id).await?);
        responses.sort_by_key(|record| record.timestamp);
    }

    Ok(Json(ApiResponse::ok(survey_stats(&survey, &responses))))
}
