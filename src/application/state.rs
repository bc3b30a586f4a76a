// src/application/state.rs
//
// Application state aggregator
//
// Wires pool → repositories → services once, and produces the in-memory
// collections the rest of the application reads.

use std::sync::Arc;

use log::info;
use serde::Serialize;

use crate::db::{open_catalog, ConnectionPool, DatabaseConfig};
use crate::domain::company::Company;
use crate::domain::group::GroupWithCompany;
use crate::domain::idol::IdolWithRelations;
use crate::domain::media_content::MediaContentWithRelations;
use crate::domain::zodiac::ZodiacSign;
use crate::error::AppResult;
use crate::repositories::{
    IdolFilters, MediaContentFilters, SqliteCompanyRepository, SqliteGroupRepository,
    SqliteIdolRepository, SqliteMediaContentRepository, SqliteZodiacSignRepository,
    ZodiacSignRepository,
};
use crate::services::{IdolService, MediaContentService, OrganizationService};

/// Everything a screen needs, read in one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSnapshot {
    pub idols: Vec<IdolWithRelations>,
    pub companies: Vec<Company>,
    pub groups: Vec<GroupWithCompany>,
    pub media_content: Vec<MediaContentWithRelations>,
    pub signs: Vec<ZodiacSign>,
}

/// Application state.
/// All fields are Arc-wrapped for sharing across the embedding application.
pub struct AppState {
    pub pool: Arc<ConnectionPool>,
    pub zodiac_signs: Arc<dyn ZodiacSignRepository>,
    pub organization_service: Arc<OrganizationService>,
    pub idol_service: Arc<IdolService>,
    pub media_content_service: Arc<MediaContentService>,
}

impl AppState {
    /// Wire services over an initialised catalog pool
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        let organization_service = OrganizationService::new(
            Arc::new(SqliteCompanyRepository::new(pool.clone())),
            Arc::new(SqliteGroupRepository::new(pool.clone())),
        );
        let idol_service = IdolService::new(Arc::new(SqliteIdolRepository::new(pool.clone())));
        let media_content_service =
            MediaContentService::new(Arc::new(SqliteMediaContentRepository::new(pool.clone())));

        Self {
            zodiac_signs: Arc::new(SqliteZodiacSignRepository::new(pool.clone())),
            organization_service: Arc::new(organization_service),
            idol_service: Arc::new(idol_service),
            media_content_service: Arc::new(media_content_service),
            pool,
        }
    }

    /// Open the catalog described by `config` and wire services over it
    pub fn open(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = open_catalog(config)?;
        info!("Catalog ready at {}", config.path.display());
        Ok(Self::new(pool))
    }

    pub fn snapshot(&self) -> AppResult<CatalogSnapshot> {
        self.filtered_snapshot(&IdolFilters::default())
    }

    /// Same as `snapshot`, with the idol list narrowed by `filters`
    pub fn filtered_snapshot(&self, filters: &IdolFilters) -> AppResult<CatalogSnapshot> {
        Ok(CatalogSnapshot {
            idols: self.idol_service.filter_idols(filters)?,
            companies: self.organization_service.list_companies()?,
            groups: self.organization_service.list_groups()?,
            media_content: self
                .media_content_service
                .search(&MediaContentFilters::default())?,
            signs: self.zodiac_signs.find_all()?,
        })
    }
}
