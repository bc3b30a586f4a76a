// src/repositories/idol_repository.rs
//
// Idol persistence and aggregate reads
//
// PRINCIPLES:
// - An aggregate is built from three queries (idol rows with sign names,
//   membership rows, appearance rows), all restricted by the same id
//   selection and grouped by idol id here
// - Every multi-table write runs in one transaction
// - Create writes only the sign slots that are set; update writes all of
//   them, clearing the unset ones

use std::sync::Arc;

use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction};

use crate::db::{run_in_transaction, ConnectionPool};
use crate::domain::idol::{
    GroupAssignment, Idol, IdolAppearance, IdolMembership, IdolUpdate, IdolWithRelations,
    MediaAssignment, NewIdol,
};
use crate::domain::zodiac::{Planet, SignIds};
use crate::error::{AppError, AppResult};
use crate::repositories::decode::{
    date_column, date_param, media_type_column, sign_ids, sign_names,
};
use crate::repositories::filters::IdolFilters;
use crate::repositories::query::IdQuery;
use crate::repositories::relations::{load_grouped, load_rows};

const MEMBERSHIP_SQL: &str = "SELECT ig.idol_id, g.id AS group_id, g.name AS group_name,
            ig.is_active
     FROM idol_group ig
     JOIN \"group\" g ON g.id = ig.group_id
     WHERE ig.idol_id IN ({ids})
     ORDER BY g.name, g.id";

const APPEARANCE_SQL: &str = "SELECT imc.idol_id, m.id AS media_content_id, m.title,
            m.type AS media_type, imc.role
     FROM idol_media_content imc
     JOIN media_content m ON m.id = imc.media_content_id
     WHERE imc.idol_id IN ({ids})
     ORDER BY m.title, m.id";

#[cfg_attr(test, mockall::automock)]
pub trait IdolRepository: Send + Sync {
    fn find_all(&self) -> AppResult<Vec<Idol>>;
    fn find_by_id(&self, id: i64) -> AppResult<Option<Idol>>;
    fn find_with_relations(&self, id: i64) -> AppResult<Option<IdolWithRelations>>;
    fn find_all_with_relations(&self) -> AppResult<Vec<IdolWithRelations>>;
    fn find_by_filters(&self, filters: &IdolFilters) -> AppResult<Vec<IdolWithRelations>>;

    /// Substring match on stage name or Korean name
    fn find_by_name(&self, name: &str) -> AppResult<Vec<IdolWithRelations>>;

    /// Exact name, optionally restricted to members of one group
    fn exists(&self, name: &str, group_id: Option<i64>) -> AppResult<bool>;

    fn create(&self, idol: &NewIdol) -> AppResult<i64>;
    fn update(&self, id: i64, update: &IdolUpdate) -> AppResult<()>;

    /// Write only the slots present in `signs`, leaving the others as stored
    fn update_signs(&self, id: i64, signs: &SignIds) -> AppResult<()>;

    fn delete(&self, id: i64) -> AppResult<()>;
}

pub struct SqliteIdolRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteIdolRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn base_columns() -> String {
        let mut columns = vec![
            "i.id".to_string(),
            "i.name".to_string(),
            "i.korean_name".to_string(),
            "i.birth_date".to_string(),
            "i.image_url".to_string(),
        ];
        columns.extend(Planet::ALL.iter().map(|p| format!("i.{}", p.sign_id_column())));
        columns.join(", ")
    }

    /// Idol row plus the eleven sign-name lookups, restricted to `{ids}`
    fn aggregate_sql() -> String {
        let names = Planet::ALL
            .iter()
            .map(|p| format!("{}.name AS {}", p.join_alias(), p.sign_name_column()))
            .collect::<Vec<_>>()
            .join(", ");
        let joins = Planet::ALL
            .iter()
            .map(|p| {
                format!(
                    "LEFT JOIN western_zodiac_sign {alias} ON {alias}.id = i.{column}",
                    alias = p.join_alias(),
                    column = p.sign_id_column()
                )
            })
            .collect::<Vec<_>>()
            .join("\n     ");

        format!(
            "SELECT {}, {}
     FROM idol i
     {}
     WHERE i.id IN ({{ids}})
     ORDER BY i.name, i.id",
            Self::base_columns(),
            names,
            joins
        )
    }

    fn row_to_idol(row: &Row) -> Result<Idol, rusqlite::Error> {
        Ok(Idol {
            id: row.get("id")?,
            name: row.get("name")?,
            korean_name: row.get("korean_name")?,
            birth_date: date_column(row, "birth_date")?,
            image_url: row.get("image_url")?,
            signs: sign_ids(row)?,
        })
    }

    fn row_to_membership(row: &Row) -> Result<(i64, IdolMembership), rusqlite::Error> {
        Ok((
            row.get("idol_id")?,
            IdolMembership {
                group_id: row.get("group_id")?,
                group_name: row.get("group_name")?,
                is_active: row.get("is_active")?,
            },
        ))
    }

    fn row_to_appearance(row: &Row) -> Result<(i64, IdolAppearance), rusqlite::Error> {
        Ok((
            row.get("idol_id")?,
            IdolAppearance {
                media_content_id: row.get("media_content_id")?,
                media_content_title: row.get("title")?,
                media_type: media_type_column(row, "media_type")?,
                role: row.get("role")?,
            },
        ))
    }

    /// Assemble the aggregates for every idol selected by `ids`
    fn load_aggregates(conn: &Connection, ids: &IdQuery) -> AppResult<Vec<IdolWithRelations>> {
        let idols = load_rows(conn, &Self::aggregate_sql(), ids, |row| {
            Ok((Self::row_to_idol(row)?, sign_names(row)?))
        })?;
        if idols.is_empty() {
            return Ok(Vec::new());
        }

        let mut memberships = load_grouped(conn, MEMBERSHIP_SQL, ids, Self::row_to_membership)?;
        let mut appearances = load_grouped(conn, APPEARANCE_SQL, ids, Self::row_to_appearance)?;

        Ok(idols
            .into_iter()
            .map(|(idol, names)| {
                let groups = memberships.remove(&idol.id).unwrap_or_default();
                let media = appearances.remove(&idol.id).unwrap_or_default();
                IdolWithRelations::new(idol, names, groups, media)
            })
            .collect())
    }

    fn by_id(id: i64) -> IdQuery {
        let mut builder = IdolFilters::builder();
        builder.filter("i.id = ?", id);
        builder.build()
    }

    fn insert_memberships(
        tx: &Transaction<'_>,
        idol_id: i64,
        groups: &[GroupAssignment],
    ) -> AppResult<()> {
        let mut stmt = tx.prepare(
            "INSERT INTO idol_group (idol_id, group_id, is_active) VALUES (?1, ?2, ?3)",
        )?;
        for group in groups {
            stmt.execute(params![idol_id, group.group_id, group.is_active])?;
        }
        Ok(())
    }

    fn insert_appearances(
        tx: &Transaction<'_>,
        idol_id: i64,
        media: &[MediaAssignment],
    ) -> AppResult<()> {
        let mut stmt = tx.prepare(
            "INSERT INTO idol_media_content (idol_id, media_content_id, role) VALUES (?1, ?2, ?3)",
        )?;
        for entry in media {
            stmt.execute(params![idol_id, entry.media_content_id, entry.role])?;
        }
        Ok(())
    }

    /// INSERT with only the columns the caller supplied
    fn insert_idol(tx: &Transaction<'_>, idol: &NewIdol) -> AppResult<i64> {
        let mut columns: Vec<&str> = vec!["name"];
        let mut values: Vec<Value> = vec![Value::Text(idol.name.clone())];

        if let Some(korean_name) = &idol.korean_name {
            columns.push("korean_name");
            values.push(Value::Text(korean_name.clone()));
        }
        if let Some(birth_date) = date_param(idol.birth_date) {
            columns.push("birth_date");
            values.push(Value::Text(birth_date));
        }
        if let Some(image_url) = &idol.image_url {
            columns.push("image_url");
            values.push(Value::Text(image_url.clone()));
        }
        for (planet, sign_id) in idol.signs.present() {
            columns.push(planet.sign_id_column());
            values.push(Value::Integer(*sign_id));
        }

        let placeholders = (1..=columns.len())
            .map(|n| format!("?{}", n))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO idol ({}) VALUES ({})",
            columns.join(", "),
            placeholders
        );

        tx.execute(&sql, params_from_iter(values.iter()))?;
        Ok(tx.last_insert_rowid())
    }

    /// UPDATE of every scalar column; unset sign slots become NULL
    fn overwrite_idol(tx: &Transaction<'_>, id: i64, update: &IdolUpdate) -> AppResult<()> {
        let mut assignments = vec![
            "name = ?1".to_string(),
            "korean_name = ?2".to_string(),
            "birth_date = ?3".to_string(),
            "image_url = ?4".to_string(),
        ];
        let mut values: Vec<Value> = vec![
            Value::Text(update.name.clone()),
            update.korean_name.clone().into(),
            date_param(update.birth_date).into(),
            update.image_url.clone().into(),
        ];
        for (planet, sign_id) in update.signs.iter() {
            values.push(sign_id.copied().into());
            assignments.push(format!("{} = ?{}", planet.sign_id_column(), values.len()));
        }
        values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE idol SET {} WHERE id = ?{}",
            assignments.join(", "),
            values.len()
        );

        let rows = tx.execute(&sql, params_from_iter(values.iter()))?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

impl IdolRepository for SqliteIdolRepository {
    fn find_all(&self) -> AppResult<Vec<Idol>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM idol i ORDER BY i.name, i.id",
            Self::base_columns()
        ))?;
        let idols = stmt
            .query_map([], Self::row_to_idol)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(idols)
    }

    fn find_by_id(&self, id: i64) -> AppResult<Option<Idol>> {
        let conn = self.pool.get()?;

        match conn.query_row(
            &format!("SELECT {} FROM idol i WHERE i.id = ?1", Self::base_columns()),
            params![id],
            Self::row_to_idol,
        ) {
            Ok(idol) => Ok(Some(idol)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_with_relations(&self, id: i64) -> AppResult<Option<IdolWithRelations>> {
        let conn = self.pool.get()?;
        Ok(Self::load_aggregates(&conn, &Self::by_id(id))?.pop())
    }

    fn find_all_with_relations(&self) -> AppResult<Vec<IdolWithRelations>> {
        let conn = self.pool.get()?;
        Self::load_aggregates(&conn, &IdolFilters::builder().build())
    }

    fn find_by_filters(&self, filters: &IdolFilters) -> AppResult<Vec<IdolWithRelations>> {
        let mut builder = IdolFilters::builder();
        filters.apply(&mut builder);
        let ids = builder.build();
        debug!("Idol filter: {} ({} params)", ids.sql, ids.params.len());

        let conn = self.pool.get()?;
        Self::load_aggregates(&conn, &ids)
    }

    fn find_by_name(&self, name: &str) -> AppResult<Vec<IdolWithRelations>> {
        let mut builder = IdolFilters::builder();
        builder.contains_any(&["i.name", "i.korean_name"], name);

        let conn = self.pool.get()?;
        Self::load_aggregates(&conn, &builder.build())
    }

    fn exists(&self, name: &str, group_id: Option<i64>) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = match group_id {
            Some(group_id) => conn.query_row(
                "SELECT COUNT(*) FROM idol i
                 JOIN idol_group ig ON ig.idol_id = i.id
                 WHERE i.name = ?1 AND ig.group_id = ?2",
                params![name, group_id],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT COUNT(*) FROM idol WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )?,
        };

        Ok(count > 0)
    }

    fn create(&self, idol: &NewIdol) -> AppResult<i64> {
        let mut conn = self.pool.get()?;

        let id = run_in_transaction(&mut conn, "idol create", |tx| {
            let id = Self::insert_idol(tx, idol)?;
            Self::insert_memberships(tx, id, &idol.groups)?;
            Self::insert_appearances(tx, id, &idol.media_content)?;
            Ok(id)
        })?;

        info!(
            "Created idol {} ({}) with {} groups",
            id,
            idol.name,
            idol.groups.len()
        );
        Ok(id)
    }

    fn update(&self, id: i64, update: &IdolUpdate) -> AppResult<()> {
        let mut conn = self.pool.get()?;

        run_in_transaction(&mut conn, "idol update", |tx| {
            Self::overwrite_idol(tx, id, update)?;

            tx.execute("DELETE FROM idol_group WHERE idol_id = ?1", params![id])?;
            Self::insert_memberships(tx, id, &update.groups)?;

            if let Some(media) = &update.media_content {
                tx.execute("DELETE FROM idol_media_content WHERE idol_id = ?1", params![id])?;
                Self::insert_appearances(tx, id, media)?;
            }
            Ok(())
        })?;

        info!("Updated idol {} ({})", id, update.name);
        Ok(())
    }

    fn update_signs(&self, id: i64, signs: &SignIds) -> AppResult<()> {
        let conn = self.pool.get()?;

        let mut assignments = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        for (planet, sign_id) in signs.present() {
            values.push(Value::Integer(*sign_id));
            assignments.push(format!("{} = ?{}", planet.sign_id_column(), values.len()));
        }

        let rows = if assignments.is_empty() {
            conn.query_row("SELECT COUNT(*) FROM idol WHERE id = ?1", params![id], |row| {
                row.get::<_, i64>(0)
            })? as usize
        } else {
            values.push(Value::Integer(id));
            let sql = format!(
                "UPDATE idol SET {} WHERE id = ?{}",
                assignments.join(", "),
                values.len()
            );
            conn.execute(&sql, params_from_iter(values.iter()))?
        };

        if rows == 0 {
            return Err(AppError::NotFound);
        }

        info!("Updated {} sign slots of idol {}", assignments.len(), id);
        Ok(())
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows = conn.execute("DELETE FROM idol WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }

        info!("Deleted idol {}", id);
        Ok(())
    }
}
