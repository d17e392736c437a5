pub mod quiz_models;
pub mod response_models;
pub mod survey_models;
