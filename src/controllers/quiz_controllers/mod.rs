pub mod attempts;
pub mod create_quiz;
pub mod delete_quiz;
pub mod get_analytics;
pub mod get_quiz;
pub mod grade_response;
pub mod models;
pub mod scoring;
pub mod special_surveys;
pub mod whitelist;
