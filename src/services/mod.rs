// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Services validate input, run duplicate detection and delegate storage to
// the repositories. They never issue SQL themselves.

pub mod duplicates;
pub mod idol_service;
pub mod media_content_service;
pub mod organization_service;

pub use duplicates::{CreateOutcome, DuplicatePolicy};

pub use idol_service::{BirthdayEntry, IdolService};

pub use media_content_service::MediaContentService;

pub use organization_service::{CreateGroupRequest, OrganizationService};
