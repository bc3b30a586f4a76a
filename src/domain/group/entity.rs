use serde::{Deserialize, Serialize};

/// A performing group. `company_id` is None for independent acts.
///
/// Unique on (name, company_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub company_id: Option<i64>,
}

/// A group with its company's name resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupWithCompany {
    pub id: i64,
    pub name: String,
    pub company_id: Option<i64>,
    pub company_name: Option<String>,
}

/// An idol as seen from a group's roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub idol_id: i64,
    pub idol_name: String,
    pub is_active: bool,
}

/// A group with its company and full roster, former members included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupWithRelations {
    pub id: i64,
    pub name: String,
    pub company_id: Option<i64>,
    pub company_name: Option<String>,
    pub idols: Vec<GroupMember>,
}

impl GroupWithRelations {
    pub fn new(group: GroupWithCompany, idols: Vec<GroupMember>) -> Self {
        Self {
            id: group.id,
            name: group.name,
            company_id: group.company_id,
            company_name: group.company_name,
            idols,
        }
    }

    pub fn active_members(&self) -> impl Iterator<Item = &GroupMember> {
        self.idols.iter().filter(|m| m.is_active)
    }
}
