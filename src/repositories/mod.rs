// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement (services validate first)
// - NO cross-repository calls
// - Explicit SQL only, every value bound

pub mod company_repository;
pub mod decode;
pub mod filters;
pub mod group_repository;
pub mod idol_repository;
pub mod media_content_repository;
pub mod query;
pub mod relations;
pub mod zodiac_sign_repository;


pub use company_repository::{CompanyRepository, SqliteCompanyRepository};
pub use filters::{IdolFilters, MediaContentFilters};
pub use group_repository::{GroupRepository, SqliteGroupRepository};
pub use idol_repository::{IdolRepository, SqliteIdolRepository};
pub use media_content_repository::{MediaContentRepository, SqliteMediaContentRepository};
pub use query::{IdQuery, SelectBuilder};
pub use zodiac_sign_repository::{SqliteZodiacSignRepository, ZodiacSignRepository};

#[cfg(test)]
pub use company_repository::MockCompanyRepository;
#[cfg(test)]
pub use group_repository::MockGroupRepository;
#[cfg(test)]
pub use idol_repository::MockIdolRepository;
#[cfg(test)]
pub use media_content_repository::MockMediaContentRepository;
#[cfg(test)]
pub use zodiac_sign_repository::MockZodiacSignRepository;
