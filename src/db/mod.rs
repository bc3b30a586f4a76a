// src/db/mod.rs
//
// Database module
//
// Provides:
// - Configuration
// - Connection pooling
// - Schema migrations and seeding
// - Transaction helper

pub mod config;
pub mod connection;
pub mod migrations;
pub mod transaction;

use std::sync::Arc;

pub use config::DatabaseConfig;

pub use connection::{
    create_connection_pool, create_in_memory_pool, get_connection, ConnectionPool, PooledConn,
};

pub use migrations::{
    get_database_stats, initialize_database, seed_sample_catalog, verify_database_integrity,
    DatabaseStats, CURRENT_SCHEMA_VERSION,
};

pub use transaction::run_in_transaction;

use crate::error::AppResult;

/// Open (or create) the catalog described by `config`: pool, schema,
/// reference data and, when enabled, the sample catalog.
pub fn open_catalog(config: &DatabaseConfig) -> AppResult<Arc<ConnectionPool>> {
    let pool = create_connection_pool(config)?;
    prepare(&pool, config.seed_sample_data)?;
    Ok(Arc::new(pool))
}

/// Fresh in-memory catalog with schema and zodiac signs in place.
pub fn open_in_memory_catalog() -> AppResult<Arc<ConnectionPool>> {
    let pool = create_in_memory_pool()?;
    prepare(&pool, false)?;
    Ok(Arc::new(pool))
}

fn prepare(pool: &ConnectionPool, seed_sample_data: bool) -> AppResult<()> {
    let conn = get_connection(pool)?;
    initialize_database(&conn)?;
    if seed_sample_data {
        seed_sample_catalog(&conn)?;
    }
    Ok(())
}
