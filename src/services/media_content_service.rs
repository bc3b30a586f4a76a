// src/services/media_content_service.rs
use std::sync::Arc;

use crate::domain::media_content::{
    validate_media_content_update, validate_new_media_content, MediaContentUpdate,
    MediaContentWithRelations, NewMediaContent,
};
use crate::error::{AppError, AppResult};
use crate::repositories::{MediaContentFilters, MediaContentRepository};
use crate::services::duplicates::{create_with_policy, CreateOutcome, DuplicatePolicy};

pub struct MediaContentService {
    media_repo: Arc<dyn MediaContentRepository>,
}

impl MediaContentService {
    pub fn new(media_repo: Arc<dyn MediaContentRepository>) -> Self {
        Self { media_repo }
    }

    pub fn create_media_content(
        &self,
        media: NewMediaContent,
        policy: DuplicatePolicy,
    ) -> AppResult<CreateOutcome<MediaContentWithRelations>> {
        validate_new_media_content(&media).map_err(AppError::Domain)?;

        create_with_policy(
            policy,
            || self.media_repo.find_by_name(media.title.trim()),
            || self.media_repo.create(&media),
        )
    }

    pub fn update_media_content(&self, media_id: i64, update: MediaContentUpdate) -> AppResult<()> {
        validate_media_content_update(&update).map_err(AppError::Domain)?;
        self.media_repo.update(media_id, &update)
    }

    pub fn get_media_content(&self, media_id: i64) -> AppResult<Option<MediaContentWithRelations>> {
        self.media_repo.find_with_relations(media_id)
    }

    pub fn search(
        &self,
        filters: &MediaContentFilters,
    ) -> AppResult<Vec<MediaContentWithRelations>> {
        self.media_repo.find_by_filters(filters)
    }

    pub fn delete_media_content(&self, media_id: i64) -> AppResult<()> {
        self.media_repo.delete(media_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media_content::{MediaContent, MediaType};
    use crate::repositories::MockMediaContentRepository;

    fn existing(id: i64, title: &str, media_type: MediaType) -> MediaContentWithRelations {
        MediaContentWithRelations::new(
            MediaContent {
                id,
                title: title.to_string(),
                media_type,
                release_date: None,
                description: None,
            },
            Vec::new(),
        )
    }

    #[test]
    fn test_same_title_other_type_still_reported() {
        let mut repo = MockMediaContentRepository::new();
        repo.expect_find_by_name()
            .returning(|_| Ok(vec![existing(1, "Dream High", MediaType::KDrama)]));
        repo.expect_create().never();

        let outcome = MediaContentService::new(Arc::new(repo))
            .create_media_content(
                NewMediaContent::new("Dream High", MediaType::Movie),
                DuplicatePolicy::Warn,
            )
            .unwrap();

        assert!(matches!(outcome, CreateOutcome::DuplicatesFound(ref found) if found.len() == 1));
    }

    #[test]
    fn test_create_anyway() {
        let mut repo = MockMediaContentRepository::new();
        repo.expect_create().times(1).returning(|_| Ok(4));

        let outcome = MediaContentService::new(Arc::new(repo))
            .create_media_content(
                NewMediaContent::new("Dream High", MediaType::Movie),
                DuplicatePolicy::CreateAnyway,
            )
            .unwrap();
        assert_eq!(outcome.created_id(), Some(4));
    }

    #[test]
    fn test_duplicate_cast_member_rejected() {
        let mut repo = MockMediaContentRepository::new();
        repo.expect_update().never();

        let update = MediaContentUpdate::from(
            NewMediaContent::new("Queendom", MediaType::VarietyShow)
                .with_cast(1, None)
                .with_cast(1, Some("MC")),
        );
        let result = MediaContentService::new(Arc::new(repo)).update_media_content(2, update);
        assert!(matches!(result, Err(AppError::Domain(_))));
    }

    #[test]
    fn test_search_delegates() {
        let mut repo = MockMediaContentRepository::new();
        repo.expect_find_by_filters()
            .withf(|f| f.media_type == Some(MediaType::Movie))
            .returning(|_| Ok(vec![existing(3, "Parasite", MediaType::Movie)]));

        let filters = MediaContentFilters {
            media_type: Some(MediaType::Movie),
            ..MediaContentFilters::default()
        };
        let found = MediaContentService::new(Arc::new(repo)).search(&filters).unwrap();
        assert_eq!(found[0].title, "Parasite");
    }
}
