use std::collections::HashSet;

use super::entity::{CastAssignment, MediaContentUpdate, NewMediaContent};
use crate::domain::{DomainError, DomainResult};

/// Validates media content before it is created
pub fn validate_new_media_content(media: &NewMediaContent) -> DomainResult<()> {
    validate_title(&media.title)?;
    validate_cast(&media.idols)?;
    Ok(())
}

/// Validates a full media content overwrite
pub fn validate_media_content_update(update: &MediaContentUpdate) -> DomainResult<()> {
    validate_title(&update.title)?;
    if let Some(idols) = &update.idols {
        validate_cast(idols)?;
    }
    Ok(())
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Media content title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// An idol appears at most once per media content
fn validate_cast(idols: &[CastAssignment]) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for entry in idols {
        if !seen.insert(entry.idol_id) {
            return Err(DomainError::InvariantViolation(format!(
                "Idol {} is listed twice in the cast",
                entry.idol_id
            )));
        }
    }
    Ok(())
}
