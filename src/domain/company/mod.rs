pub mod entity;
pub mod invariants;

pub use entity::{Company, CompanyWithGroups, GroupSummary};
pub use invariants::validate_company_name;
