use std::collections::HashSet;

use super::entity::{GroupAssignment, IdolUpdate, MediaAssignment, NewIdol};
use crate::domain::{DomainError, DomainResult};

/// Validates an idol before creation
pub fn validate_new_idol(idol: &NewIdol) -> DomainResult<()> {
    validate_name(&idol.name)?;
    validate_groups(&idol.groups)?;
    validate_media(&idol.media_content)?;
    Ok(())
}

/// Validates a full idol overwrite
pub fn validate_idol_update(update: &IdolUpdate) -> DomainResult<()> {
    validate_name(&update.name)?;
    validate_groups(&update.groups)?;
    if let Some(media) = &update.media_content {
        validate_media(media)?;
    }
    Ok(())
}

/// Stage name cannot be empty
fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Idol name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// One membership row per (idol, group)
fn validate_groups(groups: &[GroupAssignment]) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for group in groups {
        if !seen.insert(group.group_id) {
            return Err(DomainError::InvariantViolation(format!(
                "Group {} is assigned twice",
                group.group_id
            )));
        }
    }
    Ok(())
}

/// One appearance row per (idol, media content)
fn validate_media(media: &[MediaAssignment]) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for entry in media {
        if !seen.insert(entry.media_content_id) {
            return Err(DomainError::InvariantViolation(format!(
                "Media content {} is assigned twice",
                entry.media_content_id
            )));
        }
    }
    Ok(())
}

/// Invariants that must hold true for Idol domain:
///
/// 1. An idol can exist without groups, media or signs
/// 2. Active/former is tracked per (idol, group) pair
/// 3. Each sign slot is set independently
/// 4. Name cannot be empty

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_idol() {
        let idol = NewIdol::new("Soyeon")
            .member_of(GroupAssignment::active(1))
            .member_of(GroupAssignment::former(2));
        assert!(validate_new_idol(&idol).is_ok());
    }

    #[test]
    fn test_empty_name_fails() {
        assert!(validate_new_idol(&NewIdol::new("   ")).is_err());
    }

    #[test]
    fn test_same_group_twice_fails() {
        let idol = NewIdol::new("Soyeon")
            .member_of(GroupAssignment::active(1))
            .member_of(GroupAssignment::former(1));
        assert!(validate_new_idol(&idol).is_err());
    }

    #[test]
    fn test_same_media_twice_fails_on_update() {
        let update = IdolUpdate {
            name: "Soyeon".to_string(),
            media_content: Some(vec![
                MediaAssignment { media_content_id: 3, role: None },
                MediaAssignment { media_content_id: 3, role: Some("MC".to_string()) },
            ]),
            ..IdolUpdate::default()
        };
        assert!(validate_idol_update(&update).is_err());
    }
}
