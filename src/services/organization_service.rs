// src/services/organization_service.rs
//
// Companies and groups: duplicate-aware creation, details and deletion.

use std::sync::Arc;

use crate::domain::company::{validate_company_name, Company, CompanyWithGroups};
use crate::domain::group::{validate_group_name, GroupWithCompany, GroupWithRelations};
use crate::error::{AppError, AppResult};
use crate::repositories::{CompanyRepository, GroupRepository};
use crate::services::duplicates::{create_with_policy, CreateOutcome, DuplicatePolicy};

#[derive(Debug, Clone)]
pub struct CreateGroupRequest {
    pub name: String,
    pub company_id: Option<i64>,
}

pub struct OrganizationService {
    company_repo: Arc<dyn CompanyRepository>,
    group_repo: Arc<dyn GroupRepository>,
}

impl OrganizationService {
    pub fn new(
        company_repo: Arc<dyn CompanyRepository>,
        group_repo: Arc<dyn GroupRepository>,
    ) -> Self {
        Self {
            company_repo,
            group_repo,
        }
    }

    pub fn create_company(
        &self,
        name: &str,
        policy: DuplicatePolicy,
    ) -> AppResult<CreateOutcome<CompanyWithGroups>> {
        validate_company_name(name).map_err(AppError::Domain)?;
        let name = name.trim();

        create_with_policy(
            policy,
            || self.company_repo.find_by_name(name),
            || self.company_repo.create(name),
        )
    }

    pub fn create_group(
        &self,
        request: CreateGroupRequest,
        policy: DuplicatePolicy,
    ) -> AppResult<CreateOutcome<GroupWithCompany>> {
        validate_group_name(&request.name).map_err(AppError::Domain)?;
        let name = request.name.trim();

        if let Some(company_id) = request.company_id {
            self.company_repo
                .find_by_id(company_id)?
                .ok_or(AppError::NotFound)?;
        }

        create_with_policy(
            policy,
            || self.group_repo.find_by_name(name),
            || self.group_repo.create(name, request.company_id),
        )
    }

    pub fn delete_company(&self, company_id: i64) -> AppResult<()> {
        self.company_repo.delete(company_id)
    }

    pub fn delete_group(&self, group_id: i64) -> AppResult<()> {
        self.group_repo.delete(group_id)
    }

    pub fn company_details(&self, company_id: i64) -> AppResult<Option<CompanyWithGroups>> {
        self.company_repo.find_with_groups(company_id)
    }

    pub fn group_details(&self, group_id: i64) -> AppResult<Option<GroupWithRelations>> {
        self.group_repo.find_with_relations(group_id)
    }

    pub fn list_companies(&self) -> AppResult<Vec<Company>> {
        self.company_repo.find_all()
    }

    pub fn list_groups(&self) -> AppResult<Vec<GroupWithCompany>> {
        self.group_repo.find_all()
    }
}
