use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::quiz_controllers::{
    attempts, create_quiz, delete_quiz, get_analytics, get_quiz, grade_response,
    special_surveys, whitelist,
};
use crate::state::AppState;

pub fn quiz_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_quiz::create_quiz))
        .route(
            "/:id",
            get(get_quiz::get_quiz).delete(delete_quiz::delete_quiz),
        )
        .route(
            "/:id/attempts",
            get(attempts::list_attempts).post(attempts::start_attempt),
        )
        .route(
            "/:id/attempts/:attempt_id/submit",
            post(attempts::submit_attempt),
        )
        .route(
            "/:id/attempts/:attempt_id/responses",
            get(attempts::list_attempt_responses),
        )
        .route(
            "/:id/responses/:response_id/grade",
            post(grade_response::grade_response),
        )
        .route("/:id/analytics", get(get_analytics::get_analytics))
        .route(
            "/:id/whitelist",
            get(whitelist::list_whitelist).post(whitelist::add_to_whitelist),
        )
        .route(
            "/:id/whitelist/:wallet",
            get(whitelist::whitelist_status).delete(whitelist::remove_from_whitelist),
        )
        .route(
            "/:id/special-surveys",
            get(special_surveys::list_special_surveys),
        )
        .with_state(state)
}

pub fn special_survey_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(special_surveys::create_special_survey))
        .route(
            "/:id/access/:wallet",
            get(special_surveys::check_access),
        )
        .with_state(state)
}
