use axum::{routing::get, Router};

use crate::controllers::health_controllers::store_health;
use crate::state::AppState;

pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/store", get(store_health::store_health))
        .with_state(state)
}
