use crate::domain::{DomainError, DomainResult};

/// Group name cannot be empty
pub fn validate_group_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Group name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Invariants that must hold true for Group domain:
///
/// 1. A group may exist without a company (independent act)
/// 2. (name, company_id) is unique for groups with a company
/// 3. Deleting the company leaves the group in place, independent
/// 4. Deleting the group removes its membership rows
