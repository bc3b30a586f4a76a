// src/repositories/media_content_repository.rs
//
// Media content persistence and cast aggregates
//
// Same shape as the idol repository, one relation smaller: media rows and
// cast rows are fetched separately under one id selection and grouped here.

use std::sync::Arc;

use log::{debug, info};
use rusqlite::{params, Connection, Row, Transaction};

use crate::db::{run_in_transaction, ConnectionPool};
use crate::domain::media_content::{
    CastAssignment, CastMember, MediaContent, MediaContentUpdate, MediaContentWithRelations,
    MediaType, NewMediaContent,
};
use crate::error::{AppError, AppResult};
use crate::repositories::decode::{date_column, date_param, media_type_column};
use crate::repositories::filters::MediaContentFilters;
use crate::repositories::query::IdQuery;
use crate::repositories::relations::{load_grouped, load_rows};

const MEDIA_SQL: &str = "SELECT m.id, m.title, m.type AS media_type, m.release_date, m.description
     FROM media_content m
     WHERE m.id IN ({ids})
     ORDER BY m.title, m.id";

const CAST_SQL: &str = "SELECT imc.media_content_id, i.id AS idol_id, i.name AS idol_name, imc.role
     FROM idol_media_content imc
     JOIN idol i ON i.id = imc.idol_id
     WHERE imc.media_content_id IN ({ids})
     ORDER BY i.name, i.id";

#[cfg_attr(test, mockall::automock)]
pub trait MediaContentRepository: Send + Sync {
    fn find_all(&self) -> AppResult<Vec<MediaContent>>;
    fn find_by_id(&self, id: i64) -> AppResult<Option<MediaContent>>;
    fn find_with_relations(&self, id: i64) -> AppResult<Option<MediaContentWithRelations>>;
    fn find_all_with_relations(&self) -> AppResult<Vec<MediaContentWithRelations>>;
    fn find_by_filters(
        &self,
        filters: &MediaContentFilters,
    ) -> AppResult<Vec<MediaContentWithRelations>>;

    /// Title substring match
    fn find_by_name(&self, title: &str) -> AppResult<Vec<MediaContentWithRelations>>;

    /// Exact (title, type) pair
    fn exists(&self, title: &str, media_type: MediaType) -> AppResult<bool>;

    fn create(&self, media: &NewMediaContent) -> AppResult<i64>;
    fn update(&self, id: i64, update: &MediaContentUpdate) -> AppResult<()>;
    fn delete(&self, id: i64) -> AppResult<()>;
}

pub struct SqliteMediaContentRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteMediaContentRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_media(row: &Row) -> Result<MediaContent, rusqlite::Error> {
        Ok(MediaContent {
            id: row.get("id")?,
            title: row.get("title")?,
            media_type: media_type_column(row, "media_type")?,
            release_date: date_column(row, "release_date")?,
            description: row.get("description")?,
        })
    }

    fn row_to_cast_member(row: &Row) -> Result<(i64, CastMember), rusqlite::Error> {
        Ok((
            row.get("media_content_id")?,
            CastMember {
                idol_id: row.get("idol_id")?,
                idol_name: row.get("idol_name")?,
                role: row.get("role")?,
            },
        ))
    }

    fn load_aggregates(
        conn: &Connection,
        ids: &IdQuery,
    ) -> AppResult<Vec<MediaContentWithRelations>> {
        let media = load_rows(conn, MEDIA_SQL, ids, Self::row_to_media)?;
        if media.is_empty() {
            return Ok(Vec::new());
        }

        let mut cast = load_grouped(conn, CAST_SQL, ids, Self::row_to_cast_member)?;

        Ok(media
            .into_iter()
            .map(|m| {
                let idols = cast.remove(&m.id).unwrap_or_default();
                MediaContentWithRelations::new(m, idols)
            })
            .collect())
    }

    fn insert_cast(tx: &Transaction<'_>, media_id: i64, cast: &[CastAssignment]) -> AppResult<()> {
        let mut stmt = tx.prepare(
            "INSERT INTO idol_media_content (idol_id, media_content_id, role) VALUES (?1, ?2, ?3)",
        )?;
        for member in cast {
            stmt.execute(params![member.idol_id, media_id, member.role])?;
        }
        Ok(())
    }
}

impl MediaContentRepository for SqliteMediaContentRepository {
    fn find_all(&self) -> AppResult<Vec<MediaContent>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, type AS media_type, release_date, description
             FROM media_content
             ORDER BY title, id",
        )?;
        let media = stmt
            .query_map([], Self::row_to_media)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(media)
    }

    fn find_by_id(&self, id: i64) -> AppResult<Option<MediaContent>> {
        let conn = self.pool.get()?;

        match conn.query_row(
            "SELECT id, title, type AS media_type, release_date, description
             FROM media_content WHERE id = ?1",
            params![id],
            Self::row_to_media,
        ) {
            Ok(media) => Ok(Some(media)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_with_relations(&self, id: i64) -> AppResult<Option<MediaContentWithRelations>> {
        let mut builder = MediaContentFilters::builder();
        builder.filter("m.id = ?", id);

        let conn = self.pool.get()?;
        Ok(Self::load_aggregates(&conn, &builder.build())?.pop())
    }

    fn find_all_with_relations(&self) -> AppResult<Vec<MediaContentWithRelations>> {
        let conn = self.pool.get()?;
        Self::load_aggregates(&conn, &MediaContentFilters::builder().build())
    }

    fn find_by_filters(
        &self,
        filters: &MediaContentFilters,
    ) -> AppResult<Vec<MediaContentWithRelations>> {
        let mut builder = MediaContentFilters::builder();
        filters.apply(&mut builder);
        let ids = builder.build();
        debug!("Media content filter: {} ({} params)", ids.sql, ids.params.len());

        let conn = self.pool.get()?;
        Self::load_aggregates(&conn, &ids)
    }

    fn find_by_name(&self, title: &str) -> AppResult<Vec<MediaContentWithRelations>> {
        let mut builder = MediaContentFilters::builder();
        builder.contains("m.title", title);

        let conn = self.pool.get()?;
        Self::load_aggregates(&conn, &builder.build())
    }

    fn exists(&self, title: &str, media_type: MediaType) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM media_content WHERE title = ?1 AND type = ?2",
            params![title, media_type.as_str()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn create(&self, media: &NewMediaContent) -> AppResult<i64> {
        let mut conn = self.pool.get()?;

        let id = run_in_transaction(&mut conn, "media content create", |tx| {
            tx.execute(
                "INSERT INTO media_content (title, type, release_date, description)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    media.title,
                    media.media_type.as_str(),
                    date_param(media.release_date),
                    media.description,
                ],
            )?;
            let id = tx.last_insert_rowid();
            Self::insert_cast(tx, id, &media.idols)?;
            Ok(id)
        })?;

        info!("Created media content {} ({} / {})", id, media.title, media.media_type);
        Ok(id)
    }

    fn update(&self, id: i64, update: &MediaContentUpdate) -> AppResult<()> {
        let mut conn = self.pool.get()?;

        run_in_transaction(&mut conn, "media content update", |tx| {
            let rows = tx.execute(
                "UPDATE media_content
                 SET title = ?1, type = ?2, release_date = ?3, description = ?4
                 WHERE id = ?5",
                params![
                    update.title,
                    update.media_type.as_str(),
                    date_param(update.release_date),
                    update.description,
                    id,
                ],
            )?;
            if rows == 0 {
                return Err(AppError::NotFound);
            }

            if let Some(cast) = &update.idols {
                tx.execute(
                    "DELETE FROM idol_media_content WHERE media_content_id = ?1",
                    params![id],
                )?;
                Self::insert_cast(tx, id, cast)?;
            }
            Ok(())
        })?;

        info!("Updated media content {} ({})", id, update.title);
        Ok(())
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows = conn.execute("DELETE FROM media_content WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }

        info!("Deleted media content {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory_catalog;
    use chrono::NaiveDate;

    fn setup() -> (Arc<ConnectionPool>, SqliteMediaContentRepository) {
        let pool = open_in_memory_catalog().unwrap();
        (pool.clone(), SqliteMediaContentRepository::new(pool))
    }

    fn add_idol(pool: &ConnectionPool, name: &str, korean_name: Option<&str>) -> i64 {
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO idol (name, korean_name) VALUES (?1, ?2)",
            params![name, korean_name],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[test]
    fn test_create_round_trip() {
        let (pool, repo) = setup();
        let yuqi = add_idol(&pool, "Yuqi", None);
        let minnie = add_idol(&pool, "Minnie", None);

        let mut draft = NewMediaContent::new("Queendom 2", MediaType::VarietyShow)
            .with_cast(yuqi, Some("Contestant"))
            .with_cast(minnie, None);
        draft.release_date = NaiveDate::from_ymd_opt(2022, 3, 31);
        draft.description = Some("Girl group competition".to_string());

        let id = repo.create(&draft).unwrap();
        let found = repo.find_with_relations(id).unwrap().unwrap();

        assert_eq!(found.title, "Queendom 2");
        assert_eq!(found.media_type, MediaType::VarietyShow);
        assert_eq!(found.release_date, NaiveDate::from_ymd_opt(2022, 3, 31));
        assert_eq!(found.description.as_deref(), Some("Girl group competition"));
        assert_eq!(
            found.idols,
            vec![
                CastMember { idol_id: minnie, idol_name: "Minnie".into(), role: None },
                CastMember {
                    idol_id: yuqi,
                    idol_name: "Yuqi".into(),
                    role: Some("Contestant".into()),
                },
            ]
        );
    }

    #[test]
    fn test_title_and_type_unique_together() {
        let (_, repo) = setup();
        repo.create(&NewMediaContent::new("Dream High", MediaType::KDrama)).unwrap();

        assert!(repo.exists("Dream High", MediaType::KDrama).unwrap());
        assert!(!repo.exists("Dream High", MediaType::Movie).unwrap());

        repo.create(&NewMediaContent::new("Dream High", MediaType::Movie)).unwrap();
        let err = repo
            .create(&NewMediaContent::new("Dream High", MediaType::KDrama))
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_failed_cast_insert_rolls_back() {
        let (_, repo) = setup();

        let ghost = NewMediaContent::new("Ghost Show", MediaType::VarietyShow).with_cast(404, None);
        let result = repo.create(&ghost);

        assert!(result.is_err());
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_update_cast_optional() {
        let (pool, repo) = setup();
        let yuqi = add_idol(&pool, "Yuqi", None);
        let shuhua = add_idol(&pool, "Shuhua", None);
        let show =
            NewMediaContent::new("Running Man", MediaType::VarietyShow).with_cast(yuqi, None);
        let id = repo.create(&show).unwrap();

        let mut update = MediaContentUpdate::from(NewMediaContent::new(
            "Running Man",
            MediaType::VarietyShow,
        ));
        update.idols = None;
        update.description = Some("Weekly".to_string());
        repo.update(id, &update).unwrap();

        let found = repo.find_with_relations(id).unwrap().unwrap();
        assert_eq!(found.description.as_deref(), Some("Weekly"));
        assert_eq!(found.idols.len(), 1);

        update.idols = Some(vec![CastAssignment { idol_id: shuhua, role: Some("Guest".into()) }]);
        repo.update(id, &update).unwrap();

        let found = repo.find_with_relations(id).unwrap().unwrap();
        assert_eq!(found.idols.len(), 1);
        assert_eq!(found.idols[0].idol_id, shuhua);
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let (_, repo) = setup();
        let update = MediaContentUpdate::from(NewMediaContent::new("Nothing", MediaType::Movie));
        assert!(matches!(repo.update(5, &update), Err(AppError::NotFound)));
    }

    #[test]
    fn test_filters() {
        let (pool, repo) = setup();
        let yuqi = add_idol(&pool, "Yuqi", Some("우기"));
        let nayeon = add_idol(&pool, "Nayeon", Some("임나연"));
        repo.create(&NewMediaContent::new("Queendom", MediaType::VarietyShow).with_cast(yuqi, None))
            .unwrap();
        repo.create(&NewMediaContent::new("Queendom 2", MediaType::VarietyShow)).unwrap();
        repo.create(&NewMediaContent::new("Dream High", MediaType::KDrama).with_cast(nayeon, None))
            .unwrap();

        let all = repo.find_by_filters(&MediaContentFilters::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all, repo.find_all_with_relations().unwrap());

        let shows = MediaContentFilters {
            title: Some("queen".to_string()),
            media_type: Some(MediaType::VarietyShow),
            ..MediaContentFilters::default()
        };
        assert_eq!(repo.find_by_filters(&shows).unwrap().len(), 2);

        let with_yuqi = MediaContentFilters {
            idol_id: Some(yuqi),
            ..MediaContentFilters::default()
        };
        let found = repo.find_by_filters(&with_yuqi).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Queendom");

        let by_korean = MediaContentFilters {
            idol_name: Some("나연".to_string()),
            ..MediaContentFilters::default()
        };
        let found = repo.find_by_filters(&by_korean).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Dream High");
    }

    #[test]
    fn test_find_by_name_returns_cast() {
        let (pool, repo) = setup();
        let yuqi = add_idol(&pool, "Yuqi", None);
        repo.create(&NewMediaContent::new("Queendom", MediaType::VarietyShow).with_cast(yuqi, None))
            .unwrap();

        let found = repo.find_by_name("dom").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].idols[0].idol_name, "Yuqi");
        assert!(repo.find_by_name("Parasite").unwrap().is_empty());
    }

    #[test]
    fn test_title_search_treats_wildcards_literally() {
        let (_, repo) = setup();
        repo.create(&NewMediaContent::new("Queendom", MediaType::VarietyShow))
            .unwrap();
        repo.create(&NewMediaContent::new("100% Idol", MediaType::VarietyShow))
            .unwrap();

        assert!(repo.find_by_name("_").unwrap().is_empty());
        assert!(repo.find_by_name("Q%m").unwrap().is_empty());

        let by_title = MediaContentFilters {
            title: Some("0% I".to_string()),
            ..MediaContentFilters::default()
        };
        let found = repo.find_by_filters(&by_title).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "100% Idol");
    }

    #[test]
    fn test_unknown_stored_type_is_a_decode_error() {
        let (pool, repo) = setup();
        let id = repo.create(&NewMediaContent::new("Odd", MediaType::Movie)).unwrap();
        {
            let conn = pool.get().unwrap();
            conn.execute_batch("PRAGMA ignore_check_constraints = ON;").unwrap();
            conn.execute("UPDATE media_content SET type = 'podcast' WHERE id = ?1", params![id])
                .unwrap();
            conn.execute_batch("PRAGMA ignore_check_constraints = OFF;").unwrap();
        }

        assert!(matches!(repo.find_by_id(id), Err(AppError::Decode(_))));
    }

    #[test]
    fn test_delete() {
        let (pool, repo) = setup();
        let yuqi = add_idol(&pool, "Yuqi", None);
        let id = repo
            .create(&NewMediaContent::new("Queendom", MediaType::VarietyShow).with_cast(yuqi, None))
            .unwrap();

        repo.delete(id).unwrap();

        assert_eq!(repo.find_by_id(id).unwrap(), None);
        assert!(matches!(repo.delete(id), Err(AppError::NotFound)));
        let conn = pool.get().unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM idol_media_content", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }
}
