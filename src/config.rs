//! Runtime configuration
//!
//! Read from environment variables at startup.

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_AI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Which Record Store backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Memory => "memory",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub storage: StorageBackend,
    /// Gemini API key; without one the offline mock estimator is used
    pub api_key: Option<String>,
    pub ai_model: String,
    pub ai_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Build the config from an arbitrary lookup so tests never touch the
    /// process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let database_path = get("FITVEDA_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let storage = match get("FITVEDA_STORAGE") {
            None => StorageBackend::Sqlite,
            Some(v) => match v.trim().to_lowercase().as_str() {
                "" | "sqlite" => StorageBackend::Sqlite,
                "memory" | "mem" => StorageBackend::Memory,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "FITVEDA_STORAGE",
                        value: v,
                    })
                }
            },
        };

        let api_key = get("GEMINI_API_KEY").filter(|k| !k.trim().is_empty());
        let ai_model = get("FITVEDA_AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string());
        let ai_base_url =
            get("FITVEDA_AI_BASE_URL").unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string());

        Ok(Self {
            database_path,
            storage,
            api_key,
            ai_model,
            ai_base_url,
        })
    }
}

/// `<project>/data/fitveda.db`, located relative to the running executable
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("fitveda.db");
    path
}
