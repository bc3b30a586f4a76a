// src/services/duplicates.rs
//
// "Did you mean ... / create anyway" flow shared by every create operation.

use serde::Serialize;

use crate::error::AppResult;

/// What to do when similarly named records already exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Return the candidates instead of creating
    #[default]
    Warn,

    /// Create regardless of candidates
    CreateAnyway,
}

/// Result of a create under a `DuplicatePolicy`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum CreateOutcome<T> {
    Created(i64),
    DuplicatesFound(Vec<T>),
}

impl<T> CreateOutcome<T> {
    pub fn created_id(&self) -> Option<i64> {
        match self {
            CreateOutcome::Created(id) => Some(*id),
            CreateOutcome::DuplicatesFound(_) => None,
        }
    }
}

/// Look up candidates unless the caller already chose to create anyway,
/// then create when nothing got in the way.
pub fn create_with_policy<T>(
    policy: DuplicatePolicy,
    candidates: impl FnOnce() -> AppResult<Vec<T>>,
    create: impl FnOnce() -> AppResult<i64>,
) -> AppResult<CreateOutcome<T>> {
    if policy == DuplicatePolicy::Warn {
        let found = candidates()?;
        if !found.is_empty() {
            return Ok(CreateOutcome::DuplicatesFound(found));
        }
    }
    Ok(CreateOutcome::Created(create()?))
}
