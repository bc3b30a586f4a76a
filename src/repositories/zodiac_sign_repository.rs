// src/repositories/zodiac_sign_repository.rs
//
// Read-only access to the sign vocabulary

use std::sync::Arc;

use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::zodiac::ZodiacSign;
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
pub trait ZodiacSignRepository: Send + Sync {
    fn find_all(&self) -> AppResult<Vec<ZodiacSign>>;
    fn find_by_id(&self, id: i64) -> AppResult<Option<ZodiacSign>>;
    fn find_by_name(&self, name: &str) -> AppResult<Option<ZodiacSign>>;
}

pub struct SqliteZodiacSignRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteZodiacSignRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_sign(row: &Row) -> Result<ZodiacSign, rusqlite::Error> {
        Ok(ZodiacSign {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }

    fn find_one(&self, sql: &str, key: &dyn rusqlite::ToSql) -> AppResult<Option<ZodiacSign>> {
        let conn = self.pool.get()?;
        match conn.query_row(sql, params![key], Self::row_to_sign) {
            Ok(sign) => Ok(Some(sign)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl ZodiacSignRepository for SqliteZodiacSignRepository {
    fn find_all(&self) -> AppResult<Vec<ZodiacSign>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM western_zodiac_sign ORDER BY id")?;
        let signs = stmt
            .query_map([], Self::row_to_sign)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(signs)
    }

    fn find_by_id(&self, id: i64) -> AppResult<Option<ZodiacSign>> {
        self.find_one("SELECT id, name FROM western_zodiac_sign WHERE id = ?1", &id)
    }

    fn find_by_name(&self, name: &str) -> AppResult<Option<ZodiacSign>> {
        self.find_one("SELECT id, name FROM western_zodiac_sign WHERE name = ?1", &name)
    }
}
