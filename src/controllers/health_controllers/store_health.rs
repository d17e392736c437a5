use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;
use crate::utils::{error::AppResult, response::ApiResponse};

/// Round-trips to the configured survey store.
pub async fn store_health(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Value>>> {
    state.store.ping().await?;

    Ok(Json(ApiResponse::ok(json!({ "backend": state.store.backend() }))))
}
