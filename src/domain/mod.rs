// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod company;
pub mod group;
pub mod idol;
pub mod media_content;
pub mod zodiac;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Zodiac vocabulary and charts
pub use zodiac::{Chart, Planet, SignIds, SignNames, ZodiacSign, SIGN_NAMES};

// Company Domain
pub use company::{validate_company_name, Company, CompanyWithGroups, GroupSummary};

// Group Domain
pub use group::{validate_group_name, Group, GroupMember, GroupWithCompany, GroupWithRelations};

// Idol Domain
pub use idol::{
    validate_idol_update, validate_new_idol, GroupAssignment, Idol, IdolAppearance,
    IdolMembership, IdolUpdate, IdolWithRelations, MediaAssignment, NewIdol,
};

// Media Content Domain
pub use media_content::{
    validate_media_content_update, validate_new_media_content, CastAssignment, CastMember,
    MediaContent, MediaContentUpdate, MediaContentWithRelations, MediaType, NewMediaContent,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
