use axum::{extract::State, Json};

use crate::models::survey_models::Survey;
use crate::state::AppState;
use crate::utils::{error::AppResult, response::ApiResponse};

pub async fn list_surveys(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Survey>>>> {
    let surveys = state.store.list_surveys().await?;

    Ok(Json(ApiResponse::ok(surveys)))
}
