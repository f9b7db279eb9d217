use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tracklane_core::{AppResult, ProjectId, TenantId};
use tracklane_domain::{PermissionId, PermissionType, RoleId};

/// Storage port for tenant-wide role assignments.
#[async_trait]
pub trait PermissionAssignmentRepository: Send + Sync {
    /// Lists bound roles per permission. Permissions without roles may be omitted.
    async fn list_role_ids(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
    ) -> AppResult<HashMap<PermissionId, BTreeSet<RoleId>>>;

    /// Binds a role. Binding a present role is a no-op.
    async fn add_role(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()>;

    /// Unbinds a role. Unbinding an absent role is a no-op.
    async fn remove_role(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()>;

    /// Removes every role binding of the permission.
    async fn delete_assignment(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_id: PermissionId,
    ) -> AppResult<()>;
}

/// Storage port for project-level role assignments.
#[async_trait]
pub trait ProjectPermissionAssignmentRepository: Send + Sync {
    /// Lists bound roles per permission in one project.
    async fn list_role_ids(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
    ) -> AppResult<HashMap<PermissionId, BTreeSet<RoleId>>>;

    /// Lists bound roles per project for each permission, across every project of the tenant.
    async fn list_project_role_ids(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<(ProjectId, PermissionId, BTreeSet<RoleId>)>>;

    /// Binds a role in one project. Binding a present role is a no-op.
    async fn add_role(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()>;

    /// Unbinds a role in one project. Unbinding an absent role is a no-op.
    async fn remove_role(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()>;

    /// Removes every role binding of the permission in one project.
    async fn delete_assignment(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_id: PermissionId,
    ) -> AppResult<()>;
}
