// src/services/idol_service.rs
//
// Idol orchestration: validation, duplicate detection, timeline views.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::idol::{
    validate_idol_update, validate_new_idol, IdolUpdate, IdolWithRelations, NewIdol,
};
use crate::domain::media_content::MediaType;
use crate::domain::zodiac::SignIds;
use crate::error::{AppError, AppResult};
use crate::repositories::{IdolFilters, IdolRepository};
use crate::services::duplicates::{create_with_policy, CreateOutcome, DuplicatePolicy};

/// One point on the birthday timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthdayEntry {
    pub idol_id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
}

pub struct IdolService {
    idol_repo: Arc<dyn IdolRepository>,
}

impl IdolService {
    pub fn new(idol_repo: Arc<dyn IdolRepository>) -> Self {
        Self { idol_repo }
    }

    /// Validate, then create unless similarly named idols exist and the
    /// policy says to warn. Candidates match on stage or Korean name.
    pub fn create_idol(
        &self,
        idol: NewIdol,
        policy: DuplicatePolicy,
    ) -> AppResult<CreateOutcome<IdolWithRelations>> {
        validate_new_idol(&idol).map_err(AppError::Domain)?;

        create_with_policy(
            policy,
            || {
                let mut candidates = self.idol_repo.find_by_name(idol.name.trim())?;
                let korean_name = idol
                    .korean_name
                    .as_deref()
                    .filter(|k| !k.trim().is_empty());
                if let Some(korean_name) = korean_name {
                    for candidate in self.idol_repo.find_by_name(korean_name.trim())? {
                        if !candidates.iter().any(|c| c.id == candidate.id) {
                            candidates.push(candidate);
                        }
                    }
                }
                Ok(candidates)
            },
            || self.idol_repo.create(&idol),
        )
    }

    pub fn update_idol(&self, idol_id: i64, update: IdolUpdate) -> AppResult<()> {
        validate_idol_update(&update).map_err(AppError::Domain)?;
        self.idol_repo.update(idol_id, &update)
    }

    pub fn update_signs(&self, idol_id: i64, signs: SignIds) -> AppResult<()> {
        self.idol_repo.update_signs(idol_id, &signs)
    }

    pub fn get_idol(&self, idol_id: i64) -> AppResult<Option<IdolWithRelations>> {
        self.idol_repo.find_with_relations(idol_id)
    }

    pub fn filter_idols(&self, filters: &IdolFilters) -> AppResult<Vec<IdolWithRelations>> {
        self.idol_repo.find_by_filters(filters)
    }

    pub fn delete_idol(&self, idol_id: i64) -> AppResult<()> {
        self.idol_repo.delete(idol_id)
    }

    /// Idols with a known birth date, oldest first
    pub fn birthday_timeline(&self, filters: &IdolFilters) -> AppResult<Vec<BirthdayEntry>> {
        let mut entries: Vec<BirthdayEntry> = self
            .idol_repo
            .find_by_filters(filters)?
            .into_iter()
            .filter_map(|idol| {
                idol.birth_date.map(|birth_date| BirthdayEntry {
                    idol_id: idol.id,
                    name: idol.name,
                    birth_date,
                })
            })
            .collect();

        entries.sort_by(|a, b| a.birth_date.cmp(&b.birth_date).then(a.idol_id.cmp(&b.idol_id)));
        Ok(entries)
    }

    /// Distinct media types the given idols appear in
    pub fn media_types_in_use(idols: &[IdolWithRelations]) -> Vec<MediaType> {
        idols
            .iter()
            .flat_map(|idol| idol.media_content.iter().map(|m| m.media_type))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
