use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// Kind of media an idol can appear in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "k-drama")]
    KDrama,
    #[serde(rename = "variety_show")]
    VarietyShow,
    #[serde(rename = "movie")]
    Movie,
}

impl MediaType {
    pub const ALL: [MediaType; 3] = [MediaType::KDrama, MediaType::VarietyShow, MediaType::Movie];

    /// Stored representation
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::KDrama => "k-drama",
            MediaType::VarietyShow => "variety_show",
            MediaType::Movie => "movie",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "k-drama" => Ok(MediaType::KDrama),
            "variety_show" => Ok(MediaType::VarietyShow),
            "movie" => Ok(MediaType::Movie),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown media type: {}",
                other
            ))),
        }
    }
}

/// A drama, variety show or movie. Unique on (title, media_type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaContent {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// An idol as seen from a media content's cast list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub idol_id: i64,
    pub idol_name: String,
    pub role: Option<String>,
}

/// Media content with its cast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaContentWithRelations {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub idols: Vec<CastMember>,
}

impl MediaContentWithRelations {
    pub fn new(media: MediaContent, idols: Vec<CastMember>) -> Self {
        Self {
            id: media.id,
            title: media.title,
            media_type: media.media_type,
            release_date: media.release_date,
            description: media.description,
            idols,
        }
    }
}

/// One cast entry to write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastAssignment {
    pub idol_id: i64,
    pub role: Option<String>,
}

/// Input for creating media content with its initial cast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMediaContent {
    pub title: String,
    pub media_type: MediaType,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub idols: Vec<CastAssignment>,
}

impl NewMediaContent {
    pub fn new(title: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            title: title.into(),
            media_type,
            release_date: None,
            description: None,
            idols: Vec::new(),
        }
    }

    pub fn with_cast(mut self, idol_id: i64, role: Option<&str>) -> Self {
        self.idols.push(CastAssignment {
            idol_id,
            role: role.map(str::to_string),
        });
        self
    }
}

/// Full overwrite of media content.
///
/// `idols = None` leaves the cast untouched; `Some(list)` replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaContentUpdate {
    pub title: String,
    pub media_type: MediaType,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub idols: Option<Vec<CastAssignment>>,
}

impl From<NewMediaContent> for MediaContentUpdate {
    fn from(draft: NewMediaContent) -> Self {
        Self {
            title: draft.title,
            media_type: draft.media_type,
            release_date: draft.release_date,
            description: draft.description,
            idols: Some(draft.idols),
        }
    }
}
