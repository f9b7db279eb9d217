use std::sync::Arc;

use crate::permission_ports::{
    PermissionAssignmentRepository, ProjectPermissionAssignmentRepository,
};

use super::*;

/// Handler for assignments keyed by tenant only.
#[derive(Clone)]
pub struct TenantScopeHandler {
    repository: Arc<dyn PermissionAssignmentRepository>,
}

impl TenantScopeHandler {
    /// Creates a tenant handler over the assignment storage port.
    #[must_use]
    pub fn new(repository: Arc<dyn PermissionAssignmentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl PermissionScopeHandler for TenantScopeHandler {
    fn scope(&self) -> PermissionScope {
        PermissionScope::Tenant
    }

    async fn assignments(
        &self,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
        request: &ScopeRequest,
    ) -> AppResult<HashMap<PermissionId, PermissionAssignment>> {
        let tenant_id = request.tenant_id();
        let mut role_ids = self
            .repository
            .list_role_ids(tenant_id, permission_type, permission_ids)
            .await?;

        Ok(permission_ids
            .iter()
            .map(|permission_id| {
                (
                    *permission_id,
                    PermissionAssignment {
                        permission_type,
                        permission_id: *permission_id,
                        tenant_id,
                        project_id: None,
                        role_ids: role_ids.remove(permission_id).unwrap_or_default(),
                    },
                )
            })
            .collect())
    }

    async fn add_role(
        &self,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        self.repository
            .add_role(request.tenant_id(), permission_type, permission_id, role_id)
            .await
    }

    async fn remove_role(
        &self,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        self.repository
            .remove_role(request.tenant_id(), permission_type, permission_id, role_id)
            .await
    }

    async fn delete_assignment(
        &self,
        permission_type: PermissionType,
        permission_id: PermissionId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        self.repository
            .delete_assignment(request.tenant_id(), permission_type, permission_id)
            .await
    }
}

/// Handler for assignments keyed by tenant and project.
#[derive(Clone)]
pub struct ProjectScopeHandler {
    repository: Arc<dyn ProjectPermissionAssignmentRepository>,
}

impl ProjectScopeHandler {
    /// Creates a project handler over the project assignment storage port.
    #[must_use]
    pub fn new(repository: Arc<dyn ProjectPermissionAssignmentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl PermissionScopeHandler for ProjectScopeHandler {
    fn scope(&self) -> PermissionScope {
        PermissionScope::Project
    }

    async fn assignments(
        &self,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
        request: &ScopeRequest,
    ) -> AppResult<HashMap<PermissionId, PermissionAssignment>> {
        let project_id = request.require_project_id(self.scope())?;
        let tenant_id = request.tenant_id();
        let mut role_ids = self
            .repository
            .list_role_ids(tenant_id, project_id, permission_type, permission_ids)
            .await?;

        Ok(permission_ids
            .iter()
            .map(|permission_id| {
                (
                    *permission_id,
                    PermissionAssignment {
                        permission_type,
                        permission_id: *permission_id,
                        tenant_id,
                        project_id: Some(project_id),
                        role_ids: role_ids.remove(permission_id).unwrap_or_default(),
                    },
                )
            })
            .collect())
    }

    async fn add_role(
        &self,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        let project_id = request.require_project_id(self.scope())?;
        self.repository
            .add_role(
                request.tenant_id(),
                project_id,
                permission_type,
                permission_id,
                role_id,
            )
            .await
    }

    async fn remove_role(
        &self,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        let project_id = request.require_project_id(self.scope())?;
        self.repository
            .remove_role(
                request.tenant_id(),
                project_id,
                permission_type,
                permission_id,
                role_id,
            )
            .await
    }

    async fn delete_assignment(
        &self,
        permission_type: PermissionType,
        permission_id: PermissionId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        let project_id = request.require_project_id(self.scope())?;
        self.repository
            .delete_assignment(request.tenant_id(), project_id, permission_type, permission_id)
            .await
    }

    async fn project_assignments(
        &self,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
        tenant_id: TenantId,
    ) -> AppResult<Vec<PermissionAssignment>> {
        let rows = self
            .repository
            .list_project_role_ids(tenant_id, permission_type, permission_ids)
            .await?;

        let mut assignments: Vec<PermissionAssignment> = rows
            .into_iter()
            .filter(|(_, _, role_ids)| !role_ids.is_empty())
            .map(|(project_id, permission_id, role_ids)| PermissionAssignment {
                permission_type,
                permission_id,
                tenant_id,
                project_id: Some(project_id),
                role_ids,
            })
            .collect();
        assignments.sort_by_key(|assignment| (assignment.permission_id, assignment.project_id));

        Ok(assignments)
    }
}
