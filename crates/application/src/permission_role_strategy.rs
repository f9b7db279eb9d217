use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::info;
use tracklane_core::{AppError, AppResult};
use tracklane_domain::{PermissionId, PermissionScope, PermissionType, RoleId};

use crate::permission_ports::{PermissionAssignment, ScopeRequest};
use crate::permission_scope::PermissionScopeRegistry;

/// Role mutation entry point for one permission type, bound to that type's scope.
#[derive(Clone)]
pub struct PermissionRoleStrategy {
    permission_type: PermissionType,
    scope: PermissionScope,
    scope_registry: Arc<PermissionScopeRegistry>,
}

impl PermissionRoleStrategy {
    /// Returns the permission type this strategy serves.
    #[must_use]
    pub fn permission_type(&self) -> PermissionType {
        self.permission_type
    }

    /// Returns the scope assignments of this type are stored at.
    #[must_use]
    pub fn scope(&self) -> PermissionScope {
        self.scope
    }

    /// Binds a role to a permission instance.
    pub async fn assign_role(
        &self,
        permission_id: PermissionId,
        role_id: RoleId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        self.scope_registry
            .handler(self.scope)?
            .add_role(self.permission_type, permission_id, role_id, request)
            .await?;

        info!(
            tenant_id = %request.tenant_id(),
            permission_type = %self.permission_type,
            permission_id = %permission_id,
            role_id = %role_id,
            scope = %self.scope,
            "permission role assigned"
        );
        Ok(())
    }

    /// Unbinds a role from a permission instance.
    pub async fn remove_role(
        &self,
        permission_id: PermissionId,
        role_id: RoleId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        self.scope_registry
            .handler(self.scope)?
            .remove_role(self.permission_type, permission_id, role_id, request)
            .await?;

        info!(
            tenant_id = %request.tenant_id(),
            permission_type = %self.permission_type,
            permission_id = %permission_id,
            role_id = %role_id,
            scope = %self.scope,
            "permission role removed"
        );
        Ok(())
    }

    /// Removes every role binding of a permission instance.
    pub async fn delete_assignment(
        &self,
        permission_id: PermissionId,
        request: &ScopeRequest,
    ) -> AppResult<()> {
        self.scope_registry
            .handler(self.scope)?
            .delete_assignment(self.permission_type, permission_id, request)
            .await
    }

    /// Reads assignments of permission instances.
    pub async fn assignments(
        &self,
        permission_ids: &[PermissionId],
        request: &ScopeRequest,
    ) -> AppResult<HashMap<PermissionId, PermissionAssignment>> {
        self.scope_registry
            .handler(self.scope)?
            .assignments(self.permission_type, permission_ids, request)
            .await
    }
}

/// Lazily built strategies, one per supported permission type.
pub struct PermissionRoleStrategyRegistry {
    scope_registry: Arc<PermissionScopeRegistry>,
    strategies: Vec<OnceLock<PermissionRoleStrategy>>,
}

impl PermissionRoleStrategyRegistry {
    /// Creates an empty registry over the scope handlers.
    #[must_use]
    pub fn new(scope_registry: Arc<PermissionScopeRegistry>) -> Self {
        Self {
            scope_registry,
            strategies: PermissionType::all()
                .iter()
                .map(|_| OnceLock::new())
                .collect(),
        }
    }

    /// Returns the permission types whose assignments are stored per tenant.
    #[must_use]
    pub fn tenant_scoped_types() -> Vec<PermissionType> {
        PermissionType::all()
            .iter()
            .copied()
            .filter(|permission_type| permission_type.scope() == PermissionScope::Tenant)
            .collect()
    }

    /// Returns the strategy of a permission type, building it on first use.
    pub fn strategy(&self, permission_type: PermissionType) -> AppResult<&PermissionRoleStrategy> {
        let slot = self
            .strategies
            .get(permission_type.ordinal())
            .ok_or_else(|| AppError::UnknownPermissionType {
                value: permission_type.as_str().to_owned(),
                supported: PermissionType::supported_names(),
            })?;

        Ok(slot.get_or_init(|| PermissionRoleStrategy {
            permission_type,
            scope: permission_type.scope(),
            scope_registry: self.scope_registry.clone(),
        }))
    }

    /// Resolves a transport name and returns its strategy.
    pub fn strategy_for_name(&self, permission_type: &str) -> AppResult<&PermissionRoleStrategy> {
        self.strategy(PermissionType::from_transport(permission_type)?)
    }

    /// Returns the scope handlers strategies dispatch to.
    #[must_use]
    pub fn scope_registry(&self) -> &Arc<PermissionScopeRegistry> {
        &self.scope_registry
    }
}
