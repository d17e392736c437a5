pub mod health_controllers;
pub mod quiz_controllers;
pub mod response_controllers;
pub mod survey_controllers;
