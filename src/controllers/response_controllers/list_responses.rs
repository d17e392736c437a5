use axum::{
    extract::{Path, State},
    Json,
};

use crate::models::response_models::ResponseRecord;
use crate::state::AppState;
use crate::utils::{error::AppResult, response::ApiResponse};

pub async fn list_responses(
    Path(survey_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ResponseRecord>>>> {
    let records = state.store.list_responses(&survey_id).await?;

    Ok(Json(ApiResponse::ok(records)))
}
