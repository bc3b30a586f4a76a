pub mod entity;
pub mod invariants;

pub use entity::{
    GroupAssignment, Idol, IdolAppearance, IdolMembership, IdolUpdate, IdolWithRelations,
    MediaAssignment, NewIdol,
};
pub use invariants::{validate_idol_update, validate_new_idol};
