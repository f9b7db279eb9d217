use async_trait::async_trait;
use tracklane_core::{AppResult, TenantId};
use tracklane_domain::{ItemTypeSet, Workflow, WorkflowId};

/// Read port for workflow graphs and their item-type set bindings.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Returns one workflow graph.
    async fn find_workflow(
        &self,
        tenant_id: TenantId,
        workflow_id: WorkflowId,
    ) -> AppResult<Option<Workflow>>;

    /// Lists item-type sets running items through the workflow.
    async fn list_item_type_sets_for_workflow(
        &self,
        tenant_id: TenantId,
        workflow_id: WorkflowId,
    ) -> AppResult<Vec<ItemTypeSet>>;
}
