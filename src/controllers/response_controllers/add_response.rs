use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use tracing::info;

use crate::controllers::response_controllers::models::AddResponseRequest;
use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    response::ApiResponse,
};

pub async fn add_response(
    Path(survey_id): Path<String>,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<AddResponseRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    let record = payload.into_record(Utc::now());
    let encrypted = record.arcium.is_some();

    state.store.add_response(&survey_id, record).await?;

    info!(survey_id = %survey_id, encrypted, "Response recorded");

    Ok((StatusCode::CREATED, Json(ApiResponse::empty())))
}
