pub mod entity;
pub mod invariants;

pub use entity::{
    CastAssignment, CastMember, MediaContent, MediaContentUpdate, MediaContentWithRelations,
    MediaType, NewMediaContent,
};
pub use invariants::{validate_media_content_update, validate_new_media_content};
