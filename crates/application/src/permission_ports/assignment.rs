use std::collections::BTreeSet;

use serde::Serialize;
use tracklane_core::{ProjectId, TenantId};
use tracklane_domain::{PermissionId, PermissionType, RoleId};

/// Role bindings of one permission instance in one scope context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionAssignment {
    /// Permission family.
    pub permission_type: PermissionType,
    /// Permission instance.
    pub permission_id: PermissionId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Project, for project-scoped assignments.
    pub project_id: Option<ProjectId>,
    /// Bound roles.
    pub role_ids: BTreeSet<RoleId>,
}

impl PermissionAssignment {
    /// Returns whether no role is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.role_ids.is_empty()
    }
}
