pub mod create_survey;
pub mod delete_survey;
pub mod get_stats;
pub mod get_survey;
pub mod list_surveys;
pub mod models;
