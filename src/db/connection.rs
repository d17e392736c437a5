use tracing::info;

use crate::db::{
    memory::MemoryStore,
    store::{StoreError, StoreResult},
    supabase::{SupabaseConfig, SupabaseStore},
};
use crate::state::AppState;
use crate::utils::config::{Config, StoreBackend};

/// Picks the backend once, at startup. Surveys and quizzes share it.
pub fn init_store(config: &Config) -> StoreResult<AppState> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory survey store, data will not survive a restart");
            Ok(AppState::shared(MemoryStore::new()))
        }
        StoreBackend::Supabase => {
            let (url, key) = match (&config.supabase_url, &config.supabase_key) {
                (Some(url), Some(key)) => (url.clone(), key.clone()),
                _ => {
                    return Err(StoreError::Configuration(
                        "set SUPABASE_URL and SUPABASE_SERVICE_ROLE or SUPABASE_ANON_KEY"
                            .to_string(),
                    ))
                }
            };

            let store = SupabaseStore::new(SupabaseConfig { url, key })?;
            info!("Using Supabase survey store");
            Ok(AppState::shared(store))
        }
    }
}
