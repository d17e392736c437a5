pub mod root;
pub mod store_health;
