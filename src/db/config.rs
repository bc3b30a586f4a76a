// src/db/config.rs
//
// Database configuration
//
// Defaults target a single-user desktop install. Environment variables
// override the location and sample seeding.

use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Environment variable overriding the database file location
pub const DB_PATH_ENV: &str = "IDOLCHART_DB_PATH";

/// Environment variable enabling the sample catalog seed
pub const SEED_SAMPLE_ENV: &str = "IDOLCHART_SEED_SAMPLE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Location of the SQLite file
    pub path: PathBuf,

    /// Upper bound on pooled connections
    pub max_connections: u32,

    /// How long SQLite waits on a locked database before failing
    pub busy_timeout_ms: u32,

    /// Insert the sample company/group/idol when the catalog is empty
    pub seed_sample_data: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("idolchart.db"),
            max_connections: 4,
            busy_timeout_ms: 5000,
            seed_sample_data: false,
        }
    }
}

impl DatabaseConfig {
    /// Config pointing at an explicit file
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Config for the per-user data directory.
    ///
    /// Path structure: {APP_DATA}/idolchart/idolchart.db
    pub fn default_location() -> AppResult<Self> {
        let app_data_dir = dirs::data_dir()
            .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?;

        let idolchart_dir = app_data_dir.join("idolchart");
        std::fs::create_dir_all(&idolchart_dir)?;

        Ok(Self::at_path(idolchart_dir.join("idolchart.db")))
    }

    /// Default location with environment overrides applied
    pub fn from_env() -> AppResult<Self> {
        let mut config = match std::env::var_os(DB_PATH_ENV) {
            Some(path) => Self::at_path(path),
            None => Self::default_location()?,
        };

        if let Ok(value) = std::env::var(SEED_SAMPLE_ENV) {
            config.seed_sample_data = parse_flag(&value);
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
