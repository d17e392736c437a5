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

pub async fn delete_survey(
    Path(survey_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !state.store.delete_survey(&survey_id).await? {
        return Err(AppError::NotFound("Survey not found".to_string()));
    }

    info!(survey_id = %survey_id, "Survey deleted");

    Ok(Json(ApiResponse::empty()))
}
