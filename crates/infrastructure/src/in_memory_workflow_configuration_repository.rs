use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracklane_application::{
    PermissionGrantRepository, ProjectRepository, ProjectSummary, WorkflowRepository,
};
use tracklane_core::{AppError, AppResult, ProjectId, TenantId};
use tracklane_domain::{
    ItemTypeSet, ItemTypeSetId, PermissionGrant, PermissionId, PermissionType, Workflow,
    WorkflowId,
};

/// In-memory workflows, item-type sets, permission grants and projects.
#[derive(Debug, Default)]
pub struct InMemoryWorkflowConfigurationRepository {
    workflows: RwLock<HashMap<(TenantId, WorkflowId), Workflow>>,
    item_type_sets: RwLock<HashMap<(TenantId, ItemTypeSetId), ItemTypeSet>>,
    grants: RwLock<HashMap<(TenantId, PermissionType, PermissionId), PermissionGrant>>,
    projects: RwLock<HashMap<(TenantId, ProjectId), ProjectSummary>>,
}

impl InMemoryWorkflowConfigurationRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a workflow. Workflow ids are unique per tenant.
    pub async fn save_workflow(&self, tenant_id: TenantId, workflow: Workflow) -> AppResult<()> {
        let key = (tenant_id, workflow.id());
        let mut workflows = self.workflows.write().await;

        if workflows.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "workflow '{}' already exists for tenant '{}'",
                key.1, key.0
            )));
        }

        workflows.insert(key, workflow);
        Ok(())
    }

    /// Stores an item-type set. Set ids are unique per tenant.
    pub async fn save_item_type_set(
        &self,
        tenant_id: TenantId,
        item_type_set: ItemTypeSet,
    ) -> AppResult<()> {
        let key = (tenant_id, item_type_set.id);
        let mut item_type_sets = self.item_type_sets.write().await;

        if item_type_sets.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "item type set '{}' already exists for tenant '{}'",
                key.1, key.0
            )));
        }

        item_type_sets.insert(key, item_type_set);
        Ok(())
    }

    /// Stores a permission grant. Permission ids are unique per tenant and type.
    pub async fn save_grant(&self, tenant_id: TenantId, grant: PermissionGrant) -> AppResult<()> {
        let key = (tenant_id, grant.permission_type(), grant.permission_id());
        let mut grants = self.grants.write().await;

        if grants.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "{} '{}' already exists for tenant '{}'",
                key.1, key.2, key.0
            )));
        }

        grants.insert(key, grant);
        Ok(())
    }

    /// Stores or renames a project.
    pub async fn save_project(
        &self,
        tenant_id: TenantId,
        project: ProjectSummary,
    ) -> AppResult<()> {
        self.projects
            .write()
            .await
            .insert((tenant_id, project.project_id), project);
        Ok(())
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowConfigurationRepository {
    async fn find_workflow(
        &self,
        tenant_id: TenantId,
        workflow_id: WorkflowId,
    ) -> AppResult<Option<Workflow>> {
        Ok(self
            .workflows
            .read()
            .await
            .get(&(tenant_id, workflow_id))
            .cloned())
    }

    async fn list_item_type_sets_for_workflow(
        &self,
        tenant_id: TenantId,
        workflow_id: WorkflowId,
    ) -> AppResult<Vec<ItemTypeSet>> {
        let item_type_sets = self.item_type_sets.read().await;

        let mut listed: Vec<ItemTypeSet> = item_type_sets
            .iter()
            .filter_map(|((stored_tenant_id, _), item_type_set)| {
                (stored_tenant_id == &tenant_id && item_type_set.uses_workflow(workflow_id))
                    .then(|| item_type_set.clone())
            })
            .collect();
        listed.sort_by_key(|item_type_set| item_type_set.id);

        Ok(listed)
    }
}

#[async_trait]
impl PermissionGrantRepository for InMemoryWorkflowConfigurationRepository {
    async fn list_grants(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        item_type_set_ids: &[ItemTypeSetId],
    ) -> AppResult<Vec<PermissionGrant>> {
        let grants = self.grants.read().await;

        let mut listed: Vec<PermissionGrant> = grants
            .iter()
            .filter_map(|((stored_tenant_id, stored_type, _), grant)| {
                (stored_tenant_id == &tenant_id
                    && stored_type == &permission_type
                    && item_type_set_ids.contains(&grant.item_type_set_id()))
                .then(|| grant.clone())
            })
            .collect();
        listed.sort_by_key(|grant| (grant.item_type_set_id(), grant.permission_id()));

        Ok(listed)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryWorkflowConfigurationRepository {
    async fn list_projects(&self, tenant_id: TenantId) -> AppResult<Vec<ProjectSummary>> {
        let projects = self.projects.read().await;

        let mut listed: Vec<ProjectSummary> = projects
            .iter()
            .filter_map(|((stored_tenant_id, _), project)| {
                (stored_tenant_id == &tenant_id).then(|| project.clone())
            })
            .collect();
        listed.sort_by(|left, right| left.name.cmp(&right.name));

        Ok(listed)
    }
}

#[cfg(test)]
mod tests;
