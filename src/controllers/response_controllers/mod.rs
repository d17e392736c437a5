pub mod add_response;
pub mod list_responses;
pub mod models;
