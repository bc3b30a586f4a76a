// src/repositories/company_repository.rs
//
// Company persistence
//
// Single-row writes, one join level on reads (company -> groups).

use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use rusqlite::{params, Connection, Row};

use crate::db::ConnectionPool;
use crate::domain::company::{Company, CompanyWithGroups, GroupSummary};
use crate::error::{AppError, AppResult};
use crate::repositories::query::{substring_clause, substring_pattern};

#[cfg_attr(test, mockall::automock)]
pub trait CompanyRepository: Send + Sync {
    fn find_all(&self) -> AppResult<Vec<Company>>;
    fn find_by_id(&self, id: i64) -> AppResult<Option<Company>>;
    fn find_with_groups(&self, id: i64) -> AppResult<Option<CompanyWithGroups>>;

    /// Substring match, each candidate with its groups
    fn find_by_name(&self, name: &str) -> AppResult<Vec<CompanyWithGroups>>;

    /// Exact name match
    fn exists(&self, name: &str) -> AppResult<bool>;

    fn create(&self, name: &str) -> AppResult<i64>;
    fn delete(&self, id: i64) -> AppResult<()>;
}

pub struct SqliteCompanyRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCompanyRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_company(row: &Row) -> Result<Company, rusqlite::Error> {
        Ok(Company {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }

    /// Groups of every company in `companies`, keyed by company id
    fn groups_for(
        conn: &Connection,
        companies: &[Company],
    ) -> AppResult<HashMap<i64, Vec<GroupSummary>>> {
        let mut stmt = conn.prepare(
            "SELECT id, name FROM \"group\" WHERE company_id = ?1 ORDER BY name, id",
        )?;

        let mut grouped = HashMap::new();
        for company in companies {
            let groups = stmt
                .query_map(params![company.id], |row| {
                    Ok(GroupSummary {
                        group_id: row.get("id")?,
                        group_name: row.get("name")?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            grouped.insert(company.id, groups);
        }
        Ok(grouped)
    }

    fn with_groups(
        conn: &Connection,
        companies: Vec<Company>,
    ) -> AppResult<Vec<CompanyWithGroups>> {
        let mut groups = Self::groups_for(conn, &companies)?;
        Ok(companies
            .into_iter()
            .map(|c| {
                let owned = groups.remove(&c.id).unwrap_or_default();
                CompanyWithGroups::new(c, owned)
            })
            .collect())
    }
}

impl CompanyRepository for SqliteCompanyRepository {
    fn find_all(&self) -> AppResult<Vec<Company>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM company ORDER BY name, id")?;
        let companies = stmt
            .query_map([], Self::row_to_company)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(companies)
    }

    fn find_by_id(&self, id: i64) -> AppResult<Option<Company>> {
        let conn = self.pool.get()?;

        match conn.query_row(
            "SELECT id, name FROM company WHERE id = ?1",
            params![id],
            Self::row_to_company,
        ) {
            Ok(company) => Ok(Some(company)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_with_groups(&self, id: i64) -> AppResult<Option<CompanyWithGroups>> {
        let conn = self.pool.get()?;

        let company = match conn.query_row(
            "SELECT id, name FROM company WHERE id = ?1",
            params![id],
            Self::row_to_company,
        ) {
            Ok(company) => company,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Self::with_groups(&conn, vec![company])?.pop())
    }

    fn find_by_name(&self, name: &str) -> AppResult<Vec<CompanyWithGroups>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT id, name FROM company WHERE {} ORDER BY name, id",
            substring_clause("name")
        ))?;
        let companies = stmt
            .query_map(params![substring_pattern(name)], Self::row_to_company)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_groups(&conn, companies)
    }

    fn exists(&self, name: &str) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM company WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn create(&self, name: &str) -> AppResult<i64> {
        let conn = self.pool.get()?;

        conn.execute("INSERT INTO company (name) VALUES (?1)", params![name])?;
        let id = conn.last_insert_rowid();

        info!("Created company {} ({})", id, name);
        Ok(id)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows = conn.execute("DELETE FROM company WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }

        info!("Deleted company {}", id);
        Ok(())
    }
}
