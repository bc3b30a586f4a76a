use serde::{Deserialize, Serialize};

/// An entertainment company. Root of the organisation hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,

    /// Unique across all companies
    pub name: String,
}

/// A group as seen from its company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group_id: i64,
    pub group_name: String,
}

/// A company together with the groups it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyWithGroups {
    pub id: i64,
    pub name: String,
    pub groups: Vec<GroupSummary>,
}

impl CompanyWithGroups {
    pub fn new(company: Company, groups: Vec<GroupSummary>) -> Self {
        Self {
            id: company.id,
            name: company.name,
            groups,
        }
    }
}
