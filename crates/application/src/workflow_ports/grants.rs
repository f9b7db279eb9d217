use async_trait::async_trait;
use tracklane_core::{AppResult, TenantId};
use tracklane_domain::{ItemTypeSetId, PermissionGrant, PermissionType};

/// Read port for permission instances configured on item-type sets.
#[async_trait]
pub trait PermissionGrantRepository: Send + Sync {
    /// Lists grants of one family owned by any of the item-type sets.
    async fn list_grants(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        item_type_set_ids: &[ItemTypeSetId],
    ) -> AppResult<Vec<PermissionGrant>>;
}
