use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::media_content::MediaType;
use crate::domain::zodiac::{Planet, SignIds, SignNames};

/// A performer. Central record of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idol {
    pub id: i64,

    /// Stage name
    pub name: String,

    /// Name in Hangul
    pub korean_name: Option<String>,

    pub birth_date: Option<NaiveDate>,

    pub image_url: Option<String>,

    /// Eleven independent sign references, each optional
    pub signs: SignIds,
}

/// One group membership, former memberships included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdolMembership {
    pub group_id: i64,
    pub group_name: String,
    pub is_active: bool,
}

/// One media appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdolAppearance {
    pub media_content_id: i64,
    pub media_content_title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub role: Option<String>,
}

/// Aggregate read: an idol, its memberships, appearances and sign names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdolWithRelations {
    pub id: i64,
    pub name: String,
    pub korean_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub signs: SignIds,
    pub sign_names: SignNames,
    pub groups: Vec<IdolMembership>,
    pub media_content: Vec<IdolAppearance>,
}

impl IdolWithRelations {
    pub fn new(
        idol: Idol,
        sign_names: SignNames,
        groups: Vec<IdolMembership>,
        media_content: Vec<IdolAppearance>,
    ) -> Self {
        Self {
            id: idol.id,
            name: idol.name,
            korean_name: idol.korean_name,
            birth_date: idol.birth_date,
            image_url: idol.image_url,
            signs: idol.signs,
            sign_names,
            groups,
            media_content,
        }
    }

    pub fn sign_name(&self, planet: Planet) -> Option<&str> {
        self.sign_names.get(planet).map(String::as_str)
    }

    pub fn membership(&self, group_id: i64) -> Option<&IdolMembership> {
        self.groups.iter().find(|g| g.group_id == group_id)
    }
}

/// One membership to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub group_id: i64,
    pub is_active: bool,
}

impl GroupAssignment {
    pub fn active(group_id: i64) -> Self {
        Self { group_id, is_active: true }
    }

    pub fn former(group_id: i64) -> Self {
        Self { group_id, is_active: false }
    }
}

/// One appearance to write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAssignment {
    pub media_content_id: i64,
    pub role: Option<String>,
}

/// Input for creating an idol.
///
/// Only the sign slots that are set are written; the rest keep the column
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewIdol {
    pub name: String,
    pub korean_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub signs: SignIds,
    pub groups: Vec<GroupAssignment>,
    pub media_content: Vec<MediaAssignment>,
}

impl NewIdol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn korean_name(mut self, korean_name: impl Into<String>) -> Self {
        self.korean_name = Some(korean_name.into());
        self
    }

    pub fn birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn sign(mut self, planet: Planet, sign_id: i64) -> Self {
        self.signs.set(planet, Some(sign_id));
        self
    }

    pub fn member_of(mut self, assignment: GroupAssignment) -> Self {
        self.groups.push(assignment);
        self
    }

    pub fn appears_in(mut self, media_content_id: i64, role: Option<&str>) -> Self {
        self.media_content.push(MediaAssignment {
            media_content_id,
            role: role.map(str::to_string),
        });
        self
    }
}

/// Full overwrite of an idol, as re-submitted by the edit form.
///
/// Every sign slot left at None is cleared. Groups are always replaced;
/// `media_content = None` leaves appearances untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdolUpdate {
    pub name: String,
    pub korean_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub signs: SignIds,
    pub groups: Vec<GroupAssignment>,
    pub media_content: Option<Vec<MediaAssignment>>,
}

impl From<NewIdol> for IdolUpdate {
    fn from(draft: NewIdol) -> Self {
        Self {
            name: draft.name,
            korean_name: draft.korean_name,
            birth_date: draft.birth_date,
            image_url: draft.image_url,
            signs: draft.signs,
            groups: draft.groups,
            media_content: Some(draft.media_content),
        }
    }
}
