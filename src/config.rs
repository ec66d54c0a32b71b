// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf};

use dotenvy::dotenv;

/// Which store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set when STORE=postgres")]
    MissingDatabaseUrl,

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub store_backend: StoreBackend,
    pub bind_addr: SocketAddr,
    /// Where uploaded questionnaire files are kept.
    pub upload_dir: PathBuf,
    pub rust_log: String,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let store_backend = match env::var("STORE").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("postgres") | Err(_) => StoreBackend::Postgres,
            Ok(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE",
                    value: other.to_string(),
                });
            }
        };

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:9103".to_string());
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "data".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let db_max_connections: u32 = match env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                value,
            })?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url,
            store_backend,
            bind_addr,
            upload_dir: PathBuf::from(upload_dir),
            rust_log,
            db_max_connections,
        })
    }

    /// Configuration for an in-memory instance, used by tests and local runs.
    pub fn in_memory(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            database_url: None,
            store_backend: StoreBackend::Memory,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            upload_dir: upload_dir.into(),
            rust_log: "error".to_string(),
            db_max_connections: 1,
        }
    }
}
