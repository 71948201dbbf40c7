//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; store clients are built from this
//! in `main` and injected into the services.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Which implementation backs a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Production driver (Firestore for users, MongoDB for the catalog)
    Remote,
    /// In-process maps (tests and local development)
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project hosting the Firestore user database
    pub gcp_project_id: String,
    /// Backend for per-user documents
    pub user_store: StoreBackend,
    /// Backend for the exercise catalog and health records
    pub catalog_store: StoreBackend,
    /// MongoDB connection string
    pub mongo_uri: String,
    /// MongoDB database name
    pub mongo_db: String,
    /// Directory containing exercises.json, bodyParts.json, equipments.json
    /// and muscles.json for the in-memory catalog
    pub exercise_data_dir: Option<PathBuf>,
    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            user_store: StoreBackend::Memory,
            catalog_store: StoreBackend::Memory,
            mongo_uri: "mongodb://localhost:27017/".to_string(),
            mongo_db: "snapdragon".to_string(),
            exercise_data_dir: None,
            bcrypt_cost: 4,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let user_store = match env::var("USER_STORE") {
            Ok(v) => parse_backend("USER_STORE", &v, "firestore")?,
            Err(_) => StoreBackend::Remote,
        };
        let catalog_store = match env::var("CATALOG_STORE") {
            Ok(v) => parse_backend("CATALOG_STORE", &v, "mongodb")?,
            Err(_) => StoreBackend::Remote,
        };

        let bcrypt_cost = parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            port: parse_or("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            user_store,
            catalog_store,
            mongo_uri: env::var("MONGO_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017/".to_string()),
            mongo_db: env::var("MONGO_DB").unwrap_or_else(|_| "snapdragon".to_string()),
            exercise_data_dir: env::var("EXERCISE_DATA_DIR").ok().map(PathBuf::from),
            bcrypt_cost,
        })
    }
}

fn parse_backend(
    name: &'static str,
    value: &str,
    remote_name: &str,
) -> Result<StoreBackend, ConfigError> {
    let normalized = value.trim().to_lowercase();
    if normalized == remote_name {
        Ok(StoreBackend::Remote)
    } else if normalized == "memory" {
        Ok(StoreBackend::Memory)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations don't race other tests in this module.
    #[test]
    fn test_config_from_env() {
        env::set_var("USER_STORE", "memory");
        env::set_var("CATALOG_STORE", "MongoDB");
        env::set_var("PORT", "9090");
        env::set_var("BCRYPT_COST", "6");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.user_store, StoreBackend::Memory);
        assert_eq!(config.catalog_store, StoreBackend::Remote);
        assert_eq!(config.port, 9090);
        assert_eq!(config.bcrypt_cost, 6);

        env::set_var("USER_STORE", "postgres");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid { name: "USER_STORE", .. })
        ));

        env::set_var("USER_STORE", "memory");
        env::set_var("BCRYPT_COST", "99");
        assert!(Config::from_env().is_err());

        for name in ["USER_STORE", "CATALOG_STORE", "PORT", "BCRYPT_COST"] {
            env::remove_var(name);
        }
    }
}
