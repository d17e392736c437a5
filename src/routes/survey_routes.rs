use axum::{routing::get, Router};

use crate::controllers::response_controllers::{add_response, list_responses};
use crate::controllers::survey_controllers::{
    create_survey, delete_survey, get_stats, get_survey, list_surveys,
};
use crate::state::AppState;

pub fn survey_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(list_surveys::list_surveys).post(create_survey::create_survey),
        )
        .route(
            "/:id",
            get(get_survey::get_survey).delete(delete_survey::delete_survey),
        )
        .route(
            "/:id/responses",
            get(list_responses::list_responses).post(add_response::add_response),
        )
        .route("/:id/stats", get(get_stats::get_stats))
        .with_state(state)
}
