use std::{env, net::SocketAddr, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Supabase,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(StoreBackend::Supabase),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub cors_origin: Option<String>,
    pub store_backend: StoreBackend,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_addr = var("SERVER_ADDR").unwrap_or_else(|| {
            info!("SERVER_ADDR not set, using default: {DEFAULT_SERVER_ADDR}");
            DEFAULT_SERVER_ADDR.to_string()
        });
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_ADDR",
                value: server_addr.clone(),
            })?;

        let store_backend: StoreBackend = match var("STORE_BACKEND") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "STORE_BACKEND",
                    value,
                })?,
            None => StoreBackend::Supabase,
        };

        let cors_origin = var("CORS_ORIGIN");
        if cors_origin.is_none() {
            warn!("CORS_ORIGIN not set, allowing any origin");
        }

        Ok(Self {
            server_addr,
            cors_origin,
            store_backend,
            supabase_url: var("SUPABASE_URL"),
            supabase_key: var("SUPABASE_SERVICE_ROLE").or_else(|| var("SUPABASE_ANON_KEY")),
        })
    }
}
