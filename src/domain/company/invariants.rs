use crate::domain::{DomainError, DomainResult};

/// Company name cannot be empty
pub fn validate_company_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Company name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
