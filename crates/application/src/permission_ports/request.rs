use tracklane_core::{AppError, AppResult, ProjectId, TenantId};
use tracklane_domain::PermissionScope;

/// Explicit tenant and project context for permission reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeRequest {
    tenant_id: TenantId,
    project_id: Option<ProjectId>,
}

impl ScopeRequest {
    /// Creates a tenant-only request.
    #[must_use]
    pub fn tenant(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            project_id: None,
        }
    }

    /// Creates a request addressing one project of the tenant.
    #[must_use]
    pub fn project(tenant_id: TenantId, project_id: ProjectId) -> Self {
        Self {
            tenant_id,
            project_id: Some(project_id),
        }
    }

    /// Returns the tenant partition.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the optional project.
    #[must_use]
    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns the project id or rejects the request for the given scope.
    pub fn require_project_id(&self, scope: PermissionScope) -> AppResult<ProjectId> {
        self.project_id.ok_or_else(|| {
            AppError::InvalidRequest(format!(
                "{scope} scope request for tenant '{}' requires a project id",
                self.tenant_id
            ))
        })
    }
}
