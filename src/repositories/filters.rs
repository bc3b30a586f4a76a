// src/repositories/filters.rs
//
// Sparse search criteria for the aggregate repositories.
//
// Every field is optional. Absent (or blank) fields add no join and no
// predicate; present fields narrow the result with an inner join plus an
// equality or substring predicate.

use serde::{Deserialize, Serialize};

use crate::domain::media_content::MediaType;
use crate::domain::zodiac::SignNames;
use crate::repositories::query::{text_criterion, SelectBuilder};

const IDOL_MEMBERSHIP_JOIN: &str = "JOIN idol_group f_ig ON f_ig.idol_id = i.id \
     JOIN \"group\" f_g ON f_g.id = f_ig.group_id";
const IDOL_COMPANY_JOIN: &str = "JOIN company f_c ON f_c.id = f_g.company_id";
const IDOL_APPEARANCE_JOIN: &str = "JOIN idol_media_content f_imc ON f_imc.idol_id = i.id \
     JOIN media_content f_m ON f_m.id = f_imc.media_content_id";

const MEDIA_CAST_JOIN: &str = "JOIN idol_media_content f_imc ON f_imc.media_content_id = m.id \
     JOIN idol f_i ON f_i.id = f_imc.idol_id";

/// Criteria for `IdolRepository::find_by_filters`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdolFilters {
    /// Substring of the stage name or the Korean name
    pub idol_name: Option<String>,

    /// Substring of the name of any group the idol belongs to
    pub group_name: Option<String>,

    /// Substring of the company owning that same group
    pub company_name: Option<String>,

    /// Exact sign name per chart slot
    pub signs: SignNames,

    pub media_type: Option<MediaType>,

    pub media_content_id: Option<i64>,
}

impl IdolFilters {
    pub fn is_empty(&self) -> bool {
        text_criterion(&self.idol_name).is_none()
            && text_criterion(&self.group_name).is_none()
            && text_criterion(&self.company_name).is_none()
            && self.signs.present().all(|(_, name)| name.trim().is_empty())
            && self.media_type.is_none()
            && self.media_content_id.is_none()
    }

    /// Base builder over `idol i`
    pub fn builder() -> SelectBuilder {
        SelectBuilder::new("i.id", "idol i")
    }

    pub fn apply(&self, builder: &mut SelectBuilder) {
        if let Some(name) = text_criterion(&self.idol_name) {
            builder.contains_any(&["i.name", "i.korean_name"], name);
        }

        // Group and company criteria must hold for the same membership row
        if let Some(group) = text_criterion(&self.group_name) {
            builder
                .join("membership", IDOL_MEMBERSHIP_JOIN)
                .contains("f_g.name", group);
        }
        if let Some(company) = text_criterion(&self.company_name) {
            builder
                .join("membership", IDOL_MEMBERSHIP_JOIN)
                .join("company", IDOL_COMPANY_JOIN)
                .contains("f_c.name", company);
        }

        for (planet, sign) in self.signs.present() {
            if sign.trim().is_empty() {
                continue;
            }
            let alias = planet.join_alias();
            builder
                .join(
                    alias,
                    format!(
                        "JOIN western_zodiac_sign {alias} ON {alias}.id = i.{column}",
                        alias = alias,
                        column = planet.sign_id_column()
                    ),
                )
                .filter(format!("{}.name = ?", alias), sign.clone());
        }

        // Same for type and id: one appearance must satisfy both
        if let Some(media_type) = self.media_type {
            builder
                .join("appearance", IDOL_APPEARANCE_JOIN)
                .filter("f_m.type = ?", media_type.as_str().to_string());
        }
        if let Some(media_id) = self.media_content_id {
            builder
                .join("appearance", IDOL_APPEARANCE_JOIN)
                .filter("f_imc.media_content_id = ?", media_id);
        }
    }
}

/// Criteria for `MediaContentRepository::find_by_filters`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaContentFilters {
    /// Substring of the title
    pub title: Option<String>,

    pub media_type: Option<MediaType>,

    /// Cast must include this idol
    pub idol_id: Option<i64>,

    /// Substring of a cast member's stage or Korean name
    pub idol_name: Option<String>,
}

impl MediaContentFilters {
    pub fn is_empty(&self) -> bool {
        text_criterion(&self.title).is_none()
            && self.media_type.is_none()
            && self.idol_id.is_none()
            && text_criterion(&self.idol_name).is_none()
    }

    /// Base builder over `media_content m`
    pub fn builder() -> SelectBuilder {
        SelectBuilder::new("m.id", "media_content m")
    }

    pub fn apply(&self, builder: &mut SelectBuilder) {
        if let Some(title) = text_criterion(&self.title) {
            builder.contains("m.title", title);
        }
        if let Some(media_type) = self.media_type {
            builder.filter("m.type = ?", media_type.as_str().to_string());
        }
        if let Some(idol_id) = self.idol_id {
            builder
                .join("cast", MEDIA_CAST_JOIN)
                .filter("f_imc.idol_id = ?", idol_id);
        }
        if let Some(name) = text_criterion(&self.idol_name) {
            builder
                .join("cast", MEDIA_CAST_JOIN)
                .contains_any(&["f_i.name", "f_i.korean_name"], name);
        }
    }
}
