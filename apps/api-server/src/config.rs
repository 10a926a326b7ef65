//! Application configuration loaded from environment variables.

use std::env;

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConfig;
#[cfg(feature = "mongo")]
use quill_infra::MongoConfig;

/// Configuration errors detected before any backend is contacted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown STORAGE_BACKEND '{0}' (expected memory, postgres or mongo)")]
    UnknownBackend(String),

    #[error("Storage backend '{0}' is not compiled in; enable the '{0}' feature")]
    BackendDisabled(&'static str),

    #[error("DATABASE_URL must be set when STORAGE_BACKEND=postgres")]
    MissingDatabaseUrl,
}

/// Which storage backend to run, with its connection parameters.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Memory,
    #[cfg(feature = "postgres")]
    Postgres(DatabaseConfig),
    #[cfg(feature = "mongo")]
    Mongo(MongoConfig),
}

impl StorageConfig {
    /// Short backend name, as accepted in `STORAGE_BACKEND`.
    pub fn name(&self) -> &'static str {
        match self {
            StorageConfig::Memory => "memory",
            #[cfg(feature = "postgres")]
            StorageConfig::Postgres(_) => "postgres",
            #[cfg(feature = "mongo")]
            StorageConfig::Mongo(_) => "mongo",
        }
    }

    /// Select the backend from `STORAGE_BACKEND` (default `memory`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "memory".to_string());

        match backend.to_lowercase().as_str() {
            "memory" => Ok(StorageConfig::Memory),
            "postgres" => Self::postgres_from_env(),
            "mongo" | "mongodb" => Self::mongo_from_env(),
            _ => Err(ConfigError::UnknownBackend(backend)),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres_from_env() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;
        let mut config = DatabaseConfig::new(url);
        if let Some(max) = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.max_connections = max;
        }
        if let Some(min) = env::var("DB_MIN_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.min_connections = min;
        }
        Ok(StorageConfig::Postgres(config))
    }

    #[cfg(not(feature = "postgres"))]
    fn postgres_from_env() -> Result<Self, ConfigError> {
        Err(ConfigError::BackendDisabled("postgres"))
    }

    #[cfg(feature = "mongo")]
    fn mongo_from_env() -> Result<Self, ConfigError> {
        Ok(StorageConfig::Mongo(MongoConfig::from_env()))
    }

    #[cfg(not(feature = "mongo"))]
    fn mongo_from_env() -> Result<Self, ConfigError> {
        Err(ConfigError::BackendDisabled("mongo"))
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            storage: StorageConfig::from_env()?,
        })
    }
}
