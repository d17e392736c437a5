pub mod health_routes;
pub mod quiz_routes;
pub mod survey_routes;

use axum::{extract::Request, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info_span;
use uuid::Uuid;

use crate::controllers::health_controllers::root;
use crate::state::AppState;

/// The full application router, without CORS.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::root))
        .nest("/api/surveys", survey_routes::survey_routes(state.clone()))
        .nest("/api/quizzes", quiz_routes::quiz_routes(state.clone()))
        .nest(
            "/api/special-surveys",
            quiz_routes::special_survey_routes(state.clone()),
        )
        .nest("/api/health", health_routes::health_routes(state))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    id = %Uuid::new_v4(),
                )
            }),
        )
}
