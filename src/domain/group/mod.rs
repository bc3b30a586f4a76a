pub mod entity;
pub mod invariants;

pub use entity::{Group, GroupMember, GroupWithCompany, GroupWithRelations};
pub use invariants::validate_group_name;
