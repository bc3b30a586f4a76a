// src/lib.rs
// IdolChart - Local-first idol catalog with astrological charts
//
// Architecture:
// - Domain-centric: entities, value types and invariants live in `domain`
// - Repositories are dumb mappers over an embedded SQLite catalog
// - Services validate and run the "did you mean / create anyway" flows
// - Application layer: state aggregation and user-facing errors
// - Local-first: one database file, one writer

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    // Company
    Company,
    CompanyWithGroups,
    // Errors
    DomainError,
    // Group
    Group,
    GroupAssignment,
    GroupMember,
    GroupSummary,
    GroupWithCompany,
    GroupWithRelations,
    // Idol
    Idol,
    IdolAppearance,
    IdolMembership,
    IdolUpdate,
    IdolWithRelations,
    MediaAssignment,
    // Media content
    CastAssignment,
    CastMember,
    MediaContent,
    MediaContentUpdate,
    MediaContentWithRelations,
    MediaType,
    NewIdol,
    NewMediaContent,
    // Zodiac
    Chart,
    Planet,
    SignIds,
    SignNames,
    ZodiacSign,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{
    create_connection_pool, create_in_memory_pool, initialize_database, open_catalog,
    open_in_memory_catalog, ConnectionPool, DatabaseConfig,
};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    CompanyRepository,
    GroupRepository,
    IdolFilters,
    IdolRepository,
    MediaContentFilters,
    MediaContentRepository,
    SqliteCompanyRepository,
    SqliteGroupRepository,
    SqliteIdolRepository,
    SqliteMediaContentRepository,
    SqliteZodiacSignRepository,
    ZodiacSignRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    BirthdayEntry,
    CreateGroupRequest,
    CreateOutcome,
    DuplicatePolicy,
    IdolService,
    MediaContentService,
    OrganizationService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, CatalogSnapshot, ErrorResponse, ErrorType};
