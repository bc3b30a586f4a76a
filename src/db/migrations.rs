// src/db/migrations.rs
//
// Database schema initialization, migrations and reference data
//
// PRINCIPLES:
// - Explicit schema versions
// - Migrations are embedded SQL, applied in order, in one transaction
// - Idempotent operations
// - Reference data is seeded once, never re-seeded

use rusqlite::{params, Connection};

use crate::domain::zodiac::SIGN_NAMES;
use crate::error::{AppError, AppResult};

/// Ordered schema migrations: (version, SQL)
const MIGRATIONS: &[(i32, &str)] = &[
    (1, include_str!("../../migrations/001_initial.sql")),
    (2, include_str!("../../migrations/002_media_content.sql")),
];

/// Current schema version
/// Increment this by appending to MIGRATIONS
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Initialize the database schema
///
/// This function:
/// 1. Checks current schema version
/// 2. Applies every pending migration inside one transaction
/// 3. Seeds the zodiac vocabulary if it is empty
///
/// Safe to call multiple times (idempotent).
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    ensure_version_table(conn)?;
    let current_version = get_schema_version(conn)?;

    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(AppError::Other(format!(
            "Schema version {} is newer than supported {}. Update the application.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    }

    if current_version < CURRENT_SCHEMA_VERSION {
        apply_migrations(conn, current_version)?;
    }

    seed_zodiac_signs(conn)?;
    Ok(())
}

fn ensure_version_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;
    Ok(())
}

/// Get current schema version
/// Returns 0 for a fresh database
fn get_schema_version(conn: &Connection) -> AppResult<i32> {
    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;

    Ok(version.unwrap_or(0))
}

fn apply_migrations(conn: &Connection, from_version: i32) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > from_version) {
        if from_version == 0 && *version == 1 {
            log::info!("Creating catalog schema");
        } else {
            log::info!("Migrating catalog schema to version {}", version);
        }

        tx.execute_batch(sql).map_err(|e| {
            AppError::Other(format!("Failed to apply schema version {}: {}", version, e))
        })?;
        tx.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at)
             VALUES (?1, datetime('now'))",
            [version],
        )?;
    }

    tx.commit()?;
    Ok(())
}

/// Insert the twelve western zodiac signs when the vocabulary is empty.
///
/// Returns the number of rows inserted (0 when already seeded).
pub fn seed_zodiac_signs(conn: &Connection) -> AppResult<usize> {
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM western_zodiac_sign", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(0);
    }

    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare("INSERT INTO western_zodiac_sign (name) VALUES (?1)")?;
        for name in SIGN_NAMES {
            stmt.execute([name])?;
        }
    }
    tx.commit()?;

    log::info!("Seeded {} zodiac signs", SIGN_NAMES.len());
    Ok(SIGN_NAMES.len())
}

/// Insert the sample catalog (Cube Entertainment / I-DLE / Soyeon)
/// when no company exists yet.
///
/// Returns true when the sample was inserted.
pub fn seed_sample_catalog(conn: &Connection) -> AppResult<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM company", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute("INSERT INTO company (name) VALUES (?1)", ["Cube Entertainment"])?;
    let company_id = tx.last_insert_rowid();

    tx.execute(
        "INSERT INTO \"group\" (name, company_id) VALUES (?1, ?2)",
        params!["I-DLE", company_id],
    )?;
    let group_id = tx.last_insert_rowid();

    tx.execute("INSERT INTO idol (name) VALUES (?1)", ["Soyeon"])?;
    let idol_id = tx.last_insert_rowid();

    tx.execute(
        "INSERT INTO idol_group (idol_id, group_id, is_active) VALUES (?1, ?2, 1)",
        params![idol_id, group_id],
    )?;
    tx.commit()?;

    log::info!("Seeded sample catalog");
    Ok(true)
}

/// Verify database integrity
///
/// Runs SQLite's integrity check.
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

    if result != "ok" {
        return Err(AppError::Other(format!("Database integrity check failed: {}", result)));
    }

    Ok(())
}

/// Get database statistics
pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;

    let count = |table: &str| -> AppResult<i64> {
        let n = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(n)
    };

    Ok(DatabaseStats {
        size_bytes: page_count * page_size,
        page_count,
        page_size,
        idol_count: count("idol")?,
        group_count: count("\"group\"")?,
        company_count: count("company")?,
        media_content_count: count("media_content")?,
    })
}

/// Database statistics
#[derive(Debug)]
pub struct DatabaseStats {
    pub size_bytes: i64,
    pub page_count: i64,
    pub page_size: i64,
    pub idol_count: i64,
    pub group_count: i64,
    pub company_count: i64,
    pub media_content_count: i64,
}
