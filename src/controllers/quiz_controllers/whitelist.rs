use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use tracing::info;

use crate::controllers::quiz_controllers::{
    models::AddWhitelistRequest,
    scoring::{load_attempt, load_quiz, whitelist_attempt},
};
use crate::models::quiz_models::WhitelistEntry;
use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    response::ApiResponse,
};

/// Wallets currently whitelisted for the quiz, newest first.
pub async fn list_whitelist(
    Path(quiz_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<WhitelistEntry>>>> {
    let quiz = load_quiz(&state, &quiz_id).await?;

    let now = Utc::now();
    let entries = state
        .quizzes
        .list_whitelist(&quiz.id)
        .await?
        .into_iter()
        .filter(|entry| entry.is_current(now))
        .collect();

    Ok(Json(ApiResponse::ok(entries)))
}

pub async fn whitelist_status(
    Path((quiz_id, wallet)): Path<(String, String)>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<WhitelistEntry>>> {
    let entry = state
        .quizzes
        .get_whitelist_entry(&quiz_id, &wallet)
        .await?
        .filter(|entry| entry.is_current(Utc::now()))
        .ok_or_else(|| AppError::NotFound("Wallet is not whitelisted".to_string()))?;

    Ok(Json(ApiResponse::ok(entry)))
}

/// Whitelists the wallet behind a passed attempt.
pub async fn add_to_whitelist(
    Path(quiz_id): Path<String>,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<AddWhitelistRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<WhitelistEntry>>)> {
    let quiz = load_quiz(&state, &quiz_id).await?;
    let attempt = load_attempt(&state, &quiz.id, &payload.attempt_id).await?;

    if !attempt.is_passed {
        return Err(AppError::BadRequest(
            "Only passed attempts can be whitelisted".to_string(),
        ));
    }

    let entry = whitelist_attempt(&state, &attempt, Utc::now()).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(entry))))
}

pub async fn remove_from_whitelist(
    Path((quiz_id, wallet)): Path<(String, String)>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !state.quizzes.remove_from_whitelist(&quiz_id, &wallet).await? {
        return Err(AppError::NotFound("Wallet is not whitelisted".to_string()));
    }

    info!(quiz_id = %quiz_id, wallet = %wallet, "Wallet removed from whitelist");

    Ok(Json(ApiResponse::empty()))
}
