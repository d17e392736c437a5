pub mod config;
pub mod error;
pub mod grading;
pub mod response;
pub mod stats;
