use std::collections::HashMap;

use async_trait::async_trait;
use tracklane_core::{AppError, AppResult, TenantId};
use tracklane_domain::{PermissionId, PermissionScope, PermissionType, RoleId};

use crate::permission_ports::{PermissionAssignment, ScopeRequest};

mod handlers;
mod registry;

pub use handlers::{ProjectScopeHandler, TenantScopeHandler};
pub use registry::PermissionScopeRegistry;

/// Role assignment capabilities for one storage scope.
///
/// Every capability is optional. The defaults reject the call with
/// [`AppError::Unsupported`], so a handler implements only what its scope stores.
#[async_trait]
pub trait PermissionScopeHandler: Send + Sync {
    /// Returns the scope this handler stores assignments at.
    fn scope(&self) -> PermissionScope;

    /// Returns the assignment of every requested permission, empty when nothing is bound.
    async fn assignments(
        &self,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
        request: &ScopeRequest,
    ) -> AppResult<HashMap<PermissionId, PermissionAssignment>> {
        let _ = (permission_type, permission_ids, request);
        Err(unsupported(self.scope(), "assignments"))
    }

    /// Binds a role to a permission. Idempotent.
    async fn add_role(
        &self,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        let _ = (permission_type, permission_id, role_id, request);
        Err(unsupported(self.scope(), "add_role"))
    }

    /// Unbinds a role from a permission. Idempotent.
    async fn remove_role(
        &self,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        let _ = (permission_type, permission_id, role_id, request);
        Err(unsupported(self.scope(), "remove_role"))
    }

    /// Removes every role binding of a permission in the request context.
    async fn delete_assignment(
        &self,
        permission_type: PermissionType,
        permission_id: PermissionId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        let _ = (permission_type, permission_id, request);
        Err(unsupported(self.scope(), "delete_assignment"))
    }

    /// Lists non-empty assignments of the permissions across every project of the tenant.
    async fn project_assignments(
        &self,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
        tenant_id: TenantId,
    ) -> AppResult<Vec<PermissionAssignment>> {
        let _ = (permission_type, permission_ids, tenant_id);
        Err(unsupported(self.scope(), "project_assignments"))
    }
}

fn unsupported(scope: PermissionScope, operation: &str) -> AppError {
    AppError::Unsupported(format!(
        "{scope} scope handler does not support '{operation}'"
    ))
}

#[cfg(test)]
mod tests;
