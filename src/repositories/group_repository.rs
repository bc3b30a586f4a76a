// src/repositories/group_repository.rs
//
// Group persistence
//
// A group's company is optional. Uniqueness is (name, company_id), and since
// SQLite treats NULLs as distinct, `exists` compares company ids NULL-aware.

use std::sync::Arc;

use log::info;
use rusqlite::{params, Connection, Row};

use crate::db::ConnectionPool;
use crate::domain::group::{Group, GroupMember, GroupWithCompany, GroupWithRelations};
use crate::error::{AppError, AppResult};
use crate::repositories::query::{substring_clause, substring_pattern};

const SELECT_WITH_COMPANY: &str = "SELECT g.id, g.name, g.company_id, c.name AS company_name
     FROM \"group\" g
     LEFT JOIN company c ON c.id = g.company_id";

#[cfg_attr(test, mockall::automock)]
pub trait GroupRepository: Send + Sync {
    fn find_all(&self) -> AppResult<Vec<GroupWithCompany>>;
    fn find_by_id(&self, id: i64) -> AppResult<Option<Group>>;
    fn find_with_company(&self, id: i64) -> AppResult<Option<GroupWithCompany>>;

    /// Company name plus the full roster, former members included
    fn find_with_relations(&self, id: i64) -> AppResult<Option<GroupWithRelations>>;

    fn find_by_company_id(&self, company_id: i64) -> AppResult<Vec<Group>>;

    /// Substring match on the group name
    fn find_by_name(&self, name: &str) -> AppResult<Vec<GroupWithCompany>>;

    /// Exact name under the same company (or among independent groups)
    fn exists(&self, name: &str, company_id: Option<i64>) -> AppResult<bool>;

    fn create(&self, name: &str, company_id: Option<i64>) -> AppResult<i64>;
    fn delete(&self, id: i64) -> AppResult<()>;
}

pub struct SqliteGroupRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteGroupRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_group(row: &Row) -> Result<Group, rusqlite::Error> {
        Ok(Group {
            id: row.get("id")?,
            name: row.get("name")?,
            company_id: row.get("company_id")?,
        })
    }

    fn row_to_group_with_company(row: &Row) -> Result<GroupWithCompany, rusqlite::Error> {
        Ok(GroupWithCompany {
            id: row.get("id")?,
            name: row.get("name")?,
            company_id: row.get("company_id")?,
            company_name: row.get("company_name")?,
        })
    }

    fn load_with_company(conn: &Connection, id: i64) -> AppResult<Option<GroupWithCompany>> {
        match conn.query_row(
            &format!("{} WHERE g.id = ?1", SELECT_WITH_COMPANY),
            params![id],
            Self::row_to_group_with_company,
        ) {
            Ok(group) => Ok(Some(group)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn load_members(conn: &Connection, group_id: i64) -> AppResult<Vec<GroupMember>> {
        let mut stmt = conn.prepare(
            "SELECT i.id, i.name, ig.is_active
             FROM idol_group ig
             JOIN idol i ON i.id = ig.idol_id
             WHERE ig.group_id = ?1
             ORDER BY i.name, i.id",
        )?;

        let members = stmt
            .query_map(params![group_id], |row| {
                Ok(GroupMember {
                    idol_id: row.get(0)?,
                    idol_name: row.get(1)?,
                    is_active: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(members)
    }
}

impl GroupRepository for SqliteGroupRepository {
    fn find_all(&self) -> AppResult<Vec<GroupWithCompany>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("{} ORDER BY g.name, g.id", SELECT_WITH_COMPANY))?;
        let groups = stmt
            .query_map([], Self::row_to_group_with_company)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(groups)
    }

    fn find_by_id(&self, id: i64) -> AppResult<Option<Group>> {
        let conn = self.pool.get()?;

        match conn.query_row(
            "SELECT id, name, company_id FROM \"group\" WHERE id = ?1",
            params![id],
            Self::row_to_group,
        ) {
            Ok(group) => Ok(Some(group)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_with_company(&self, id: i64) -> AppResult<Option<GroupWithCompany>> {
        let conn = self.pool.get()?;
        Self::load_with_company(&conn, id)
    }

    fn find_with_relations(&self, id: i64) -> AppResult<Option<GroupWithRelations>> {
        let conn = self.pool.get()?;

        let Some(group) = Self::load_with_company(&conn, id)? else {
            return Ok(None);
        };
        let members = Self::load_members(&conn, id)?;

        Ok(Some(GroupWithRelations::new(group, members)))
    }

    fn find_by_company_id(&self, company_id: i64) -> AppResult<Vec<Group>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, company_id FROM \"group\"
             WHERE company_id = ?1
             ORDER BY name, id",
        )?;
        let groups = stmt
            .query_map(params![company_id], Self::row_to_group)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(groups)
    }

    fn find_by_name(&self, name: &str) -> AppResult<Vec<GroupWithCompany>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE {} ORDER BY g.name, g.id",
            SELECT_WITH_COMPANY,
            substring_clause("g.name")
        ))?;
        let groups = stmt
            .query_map(params![substring_pattern(name)], Self::row_to_group_with_company)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(groups)
    }

    fn exists(&self, name: &str, company_id: Option<i64>) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM \"group\" WHERE name = ?1 AND company_id IS ?2",
            params![name, company_id],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn create(&self, name: &str, company_id: Option<i64>) -> AppResult<i64> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO \"group\" (name, company_id) VALUES (?1, ?2)",
            params![name, company_id],
        )?;
        let id = conn.last_insert_rowid();

        info!("Created group {} ({})", id, name);
        Ok(id)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows = conn.execute("DELETE FROM \"group\" WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }

        info!("Deleted group {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory_catalog;

    fn setup() -> (Arc<ConnectionPool>, SqliteGroupRepository) {
        let pool = open_in_memory_catalog().unwrap();
        (pool.clone(), SqliteGroupRepository::new(pool))
    }

    fn add_company(pool: &ConnectionPool, name: &str) -> i64 {
        let conn = pool.get().unwrap();
        conn.execute("INSERT INTO company (name) VALUES (?1)", params![name]).unwrap();
        conn.last_insert_rowid()
    }

    fn add_member(pool: &ConnectionPool, idol: &str, group_id: i64, is_active: bool) -> i64 {
        let conn = pool.get().unwrap();
        conn.execute("INSERT INTO idol (name) VALUES (?1)", params![idol]).unwrap();
        let idol_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO idol_group (idol_id, group_id, is_active) VALUES (?1, ?2, ?3)",
            params![idol_id, group_id, is_active],
        )
        .unwrap();
        idol_id
    }

    #[test]
    fn test_create_with_and_without_company() {
        let (pool, repo) = setup();
        let cube = add_company(&pool, "Cube Entertainment");

        let idle = repo.create("I-DLE", Some(cube)).unwrap();
        let indie = repo.create("Balming Tiger", None).unwrap();

        let idle = repo.find_with_company(idle).unwrap().unwrap();
        assert_eq!(idle.company_name.as_deref(), Some("Cube Entertainment"));

        let indie = repo.find_with_company(indie).unwrap().unwrap();
        assert_eq!(indie.company_id, None);
        assert_eq!(indie.company_name, None);
    }

    #[test]
    fn test_exists_is_null_aware() {
        let (pool, repo) = setup();
        let cube = add_company(&pool, "Cube Entertainment");
        repo.create("I-DLE", Some(cube)).unwrap();
        repo.create("Balming Tiger", None).unwrap();

        assert!(repo.exists("I-DLE", Some(cube)).unwrap());
        assert!(!repo.exists("I-DLE", None).unwrap());
        assert!(repo.exists("Balming Tiger", None).unwrap());
        assert!(!repo.exists("Balming Tiger", Some(cube)).unwrap());
    }

    #[test]
    fn test_same_name_under_same_company_rejected() {
        let (pool, repo) = setup();
        let cube = add_company(&pool, "Cube Entertainment");
        repo.create("I-DLE", Some(cube)).unwrap();

        assert!(repo.create("I-DLE", Some(cube)).unwrap_err().is_constraint_violation());
    }

    #[test]
    fn test_find_with_relations_keeps_active_flags() {
        let (pool, repo) = setup();
        let cube = add_company(&pool, "Cube Entertainment");
        let group = repo.create("I-DLE", Some(cube)).unwrap();
        let soojin = add_member(&pool, "Soojin", group, false);
        let miyeon = add_member(&pool, "Miyeon", group, true);

        let details = repo.find_with_relations(group).unwrap().unwrap();
        assert_eq!(
            details.idols,
            vec![
                GroupMember { idol_id: miyeon, idol_name: "Miyeon".into(), is_active: true },
                GroupMember { idol_id: soojin, idol_name: "Soojin".into(), is_active: false },
            ]
        );
        assert_eq!(details.active_members().count(), 1);
        assert_eq!(repo.find_with_relations(group + 100).unwrap(), None);
    }

    #[test]
    fn test_find_by_company_and_name() {
        let (pool, repo) = setup();
        let cube = add_company(&pool, "Cube Entertainment");
        repo.create("I-DLE", Some(cube)).unwrap();
        repo.create("BTOB", Some(cube)).unwrap();
        repo.create("IVE", None).unwrap();

        let owned: Vec<String> = repo
            .find_by_company_id(cube)
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(owned, vec!["BTOB", "I-DLE"]);

        let matches = repo.find_by_name("I").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].name, "I-DLE");
        assert_eq!(matches[1].name, "IVE");
        assert_eq!(repo.find_all().unwrap().len(), 3);
    }

    #[test]
    fn test_find_by_name_treats_wildcards_literally() {
        let (_, repo) = setup();
        repo.create("I-DLE", None).unwrap();
        repo.create("(G)I-DLE", None).unwrap();

        assert!(repo.find_by_name("_").unwrap().is_empty());
        assert!(repo.find_by_name("I%E").unwrap().is_empty());

        let matches = repo.find_by_name("(G)").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "(G)I-DLE");
    }

    #[test]
    fn test_delete_removes_memberships() {
        let (pool, repo) = setup();
        let group = repo.create("I-DLE", None).unwrap();
        add_member(&pool, "Yuqi", group, true);

        repo.delete(group).unwrap();

        let conn = pool.get().unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM idol_group", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
        drop(conn);
        assert!(matches!(repo.delete(group), Err(AppError::NotFound)));
    }
}
