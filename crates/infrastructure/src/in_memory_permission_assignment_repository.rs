use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use tracklane_application::{
    PermissionAssignmentRepository, ProjectPermissionAssignmentRepository,
};
use tracklane_core::{AppResult, ProjectId, TenantId};
use tracklane_domain::{PermissionId, PermissionType, RoleId};

type TenantAssignmentKey = (TenantId, PermissionType, PermissionId);
type ProjectAssignmentKey = (TenantId, ProjectId, PermissionType, PermissionId);

/// In-memory tenant-wide role assignments.
#[derive(Debug, Default)]
pub struct InMemoryPermissionAssignmentRepository {
    roles: RwLock<HashMap<TenantAssignmentKey, BTreeSet<RoleId>>>,
}

impl InMemoryPermissionAssignmentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionAssignmentRepository for InMemoryPermissionAssignmentRepository {
    async fn list_role_ids(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
    ) -> AppResult<HashMap<PermissionId, BTreeSet<RoleId>>> {
        let roles = self.roles.read().await;

        Ok(permission_ids
            .iter()
            .filter_map(|permission_id| {
                roles
                    .get(&(tenant_id, permission_type, *permission_id))
                    .map(|role_ids| (*permission_id, role_ids.clone()))
            })
            .collect())
    }

    async fn add_role(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()> {
        self.roles
            .write()
            .await
            .entry((tenant_id, permission_type, permission_id))
            .or_default()
            .insert(role_id);
        Ok(())
    }

    async fn remove_role(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        let key = (tenant_id, permission_type, permission_id);

        if let Some(role_ids) = roles.get_mut(&key) {
            role_ids.remove(&role_id);
            if role_ids.is_empty() {
                roles.remove(&key);
            }
        }
        Ok(())
    }

    async fn delete_assignment(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let removed = self
            .roles
            .write()
            .await
            .remove(&(tenant_id, permission_type, permission_id));

        debug!(
            tenant_id = %tenant_id,
            permission_type = %permission_type,
            permission_id = %permission_id,
            removed_roles = removed.map_or(0, |role_ids| role_ids.len()),
            "tenant permission assignment deleted"
        );
        Ok(())
    }
}

/// In-memory project-level role assignments.
#[derive(Debug, Default)]
pub struct InMemoryProjectPermissionAssignmentRepository {
    roles: RwLock<HashMap<ProjectAssignmentKey, BTreeSet<RoleId>>>,
}

impl InMemoryProjectPermissionAssignmentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectPermissionAssignmentRepository for InMemoryProjectPermissionAssignmentRepository {
    async fn list_role_ids(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
    ) -> AppResult<HashMap<PermissionId, BTreeSet<RoleId>>> {
        let roles = self.roles.read().await;

        Ok(permission_ids
            .iter()
            .filter_map(|permission_id| {
                roles
                    .get(&(tenant_id, project_id, permission_type, *permission_id))
                    .map(|role_ids| (*permission_id, role_ids.clone()))
            })
            .collect())
    }

    async fn list_project_role_ids(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<(ProjectId, PermissionId, BTreeSet<RoleId>)>> {
        let roles = self.roles.read().await;

        let mut listed: Vec<(ProjectId, PermissionId, BTreeSet<RoleId>)> = roles
            .iter()
            .filter_map(
                |((stored_tenant_id, project_id, stored_type, permission_id), role_ids)| {
                    (stored_tenant_id == &tenant_id
                        && stored_type == &permission_type
                        && permission_ids.contains(permission_id))
                    .then(|| (*project_id, *permission_id, role_ids.clone()))
                },
            )
            .collect();
        listed.sort_by_key(|(project_id, permission_id, _)| (*permission_id, *project_id));

        Ok(listed)
    }

    async fn add_role(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()> {
        self.roles
            .write()
            .await
            .entry((tenant_id, project_id, permission_type, permission_id))
            .or_default()
            .insert(role_id);
        Ok(())
    }

    async fn remove_role(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        let key = (tenant_id, project_id, permission_type, permission_id);

        if let Some(role_ids) = roles.get_mut(&key) {
            role_ids.remove(&role_id);
            if role_ids.is_empty() {
                roles.remove(&key);
            }
        }
        Ok(())
    }

    async fn delete_assignment(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let removed = self
            .roles
            .write()
            .await
            .remove(&(tenant_id, project_id, permission_type, permission_id));

        debug!(
            tenant_id = %tenant_id,
            project_id = %project_id,
            permission_type = %permission_type,
            permission_id = %permission_id,
            removed_roles = removed.map_or(0, |role_ids| role_ids.len()),
            "project permission assignment deleted"
        );
        Ok(())
    }
}
