use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{info, warn};
use tracklane_core::{AppError, AppResult, ProjectId, TenantId};
use tracklane_domain::{
    ItemTypeSet, ItemTypeSetId, ItemTypeSetSummary, StatusId, TransitionId, Workflow, WorkflowId,
    WorkflowTransition,
};

use crate::impact_report::{
    RemovedStatus, RemovedTransition, StatusImpactAnalysisParts, StatusImpactAnalysisResult,
    TransitionImpactAnalysisResult,
};
use crate::permission_ports::ScopeRequest;
use crate::permission_role_strategy::PermissionRoleStrategyRegistry;
use crate::workflow_ports::{PermissionGrantRepository, ProjectRepository, WorkflowRepository};

mod assignments;
mod families;
mod preservation;

/// How requested ids that do not belong to the workflow are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemovalMembership {
    /// Unknown ids are skipped and absent from the removed set.
    #[default]
    Lenient,
    /// Unknown ids fail the analysis with [`AppError::NotFound`].
    Strict,
}

/// Read-only preview of permission fallout from workflow topology edits.
#[derive(Clone)]
pub struct WorkflowImpactService {
    workflow_repository: Arc<dyn WorkflowRepository>,
    grant_repository: Arc<dyn PermissionGrantRepository>,
    project_repository: Arc<dyn ProjectRepository>,
    strategies: Arc<PermissionRoleStrategyRegistry>,
    membership: RemovalMembership,
}

/// Removal under analysis, resolved against one workflow snapshot.
struct RemovalScope<'a> {
    tenant_id: TenantId,
    workflow: &'a Workflow,
    item_type_sets: &'a [ItemTypeSet],
    removed_status_ids: BTreeSet<StatusId>,
    removed_transition_ids: BTreeSet<TransitionId>,
    project_names: HashMap<ProjectId, String>,
}

impl RemovalScope<'_> {
    fn item_type_set_ids(&self) -> Vec<ItemTypeSetId> {
        self.item_type_sets.iter().map(|set| set.id).collect()
    }

    fn item_type_set(&self, item_type_set_id: ItemTypeSetId) -> Option<&ItemTypeSet> {
        self.item_type_sets
            .iter()
            .find(|set| set.id == item_type_set_id)
    }

    fn item_type_set_summaries(&self) -> Vec<ItemTypeSetSummary> {
        self.item_type_sets
            .iter()
            .map(ItemTypeSetSummary::from)
            .collect()
    }
}

impl WorkflowImpactService {
    /// Creates an impact service with lenient membership handling.
    #[must_use]
    pub fn new(
        workflow_repository: Arc<dyn WorkflowRepository>,
        grant_repository: Arc<dyn PermissionGrantRepository>,
        project_repository: Arc<dyn ProjectRepository>,
        strategies: Arc<PermissionRoleStrategyRegistry>,
    ) -> Self {
        Self {
            workflow_repository,
            grant_repository,
            project_repository,
            strategies,
            membership: RemovalMembership::Lenient,
        }
    }

    /// Sets how requested ids outside the workflow are handled.
    #[must_use]
    pub fn with_membership(mut self, membership: RemovalMembership) -> Self {
        self.membership = membership;
        self
    }

    /// Previews removing statuses, including every transition touching them.
    pub async fn analyze_status_removal(
        &self,
        workflow_id: WorkflowId,
        status_ids: &[StatusId],
        request: &ScopeRequest,
    ) -> AppResult<StatusImpactAnalysisResult> {
        let tenant_id = request.tenant_id();
        let workflow = self.load_workflow(tenant_id, workflow_id).await?;

        let requested: BTreeSet<StatusId> = status_ids.iter().copied().collect();
        for status_id in &requested {
            if workflow.status(*status_id).is_none() {
                self.reject_or_skip(workflow_id, "status", status_id.to_string())?;
            }
        }

        let removed_statuses: Vec<RemovedStatus> = workflow
            .statuses()
            .iter()
            .filter(|status| requested.contains(&status.id))
            .map(|status| RemovedStatus {
                id: status.id,
                name: status.name.as_str().to_owned(),
                category: status.category,
            })
            .collect();
        let removed_status_ids: BTreeSet<StatusId> =
            removed_statuses.iter().map(|status| status.id).collect();

        let removed_transitions: Vec<RemovedTransition> = workflow
            .transitions_touching(&removed_status_ids)
            .into_values()
            .map(removed_transition)
            .collect();

        let item_type_sets = self
            .workflow_repository
            .list_item_type_sets_for_workflow(tenant_id, workflow_id)
            .await?;

        let scope = RemovalScope {
            tenant_id,
            workflow: &workflow,
            item_type_sets: &item_type_sets,
            removed_transition_ids: removed_transitions
                .iter()
                .map(|transition| transition.id)
                .collect(),
            removed_status_ids,
            project_names: self.project_names(tenant_id).await?,
        };

        let status_owner_impacts = self.status_owner_impacts(&scope, request).await?;
        let executor_impacts = self.executor_impacts(&scope, request).await?;
        let field_status_impacts = self.field_status_impacts(&scope, request).await?;

        let result = StatusImpactAnalysisResult::new(StatusImpactAnalysisParts {
            workflow_id,
            workflow_name: workflow.name().as_str().to_owned(),
            removed_statuses,
            removed_transitions,
            affected_item_type_sets: scope.item_type_set_summaries(),
            status_owner_impacts,
            executor_impacts,
            field_status_impacts,
        });

        info!(
            tenant_id = %tenant_id,
            workflow_id = %workflow_id,
            removed_statuses = result.removed_statuses().len(),
            removed_transitions = result.removed_transitions().len(),
            impacted_permissions = result.impacted_permission_count(),
            impacted_with_assignments = result.impacted_with_assignments_count(),
            "status removal impact analyzed"
        );

        Ok(result)
    }

    /// Previews removing transitions. Only executor permissions are affected.
    pub async fn analyze_transition_removal(
        &self,
        workflow_id: WorkflowId,
        transition_ids: &[TransitionId],
        request: &ScopeRequest,
    ) -> AppResult<TransitionImpactAnalysisResult> {
        let tenant_id = request.tenant_id();
        let workflow = self.load_workflow(tenant_id, workflow_id).await?;

        let requested: BTreeSet<TransitionId> = transition_ids.iter().copied().collect();
        for transition_id in &requested {
            if workflow.transition(*transition_id).is_none() {
                self.reject_or_skip(workflow_id, "transition", transition_id.to_string())?;
            }
        }

        let removed_transitions: Vec<RemovedTransition> = workflow
            .transitions()
            .iter()
            .filter(|transition| requested.contains(&transition.id))
            .map(removed_transition)
            .collect();

        let item_type_sets = self
            .workflow_repository
            .list_item_type_sets_for_workflow(tenant_id, workflow_id)
            .await?;

        let scope = RemovalScope {
            tenant_id,
            workflow: &workflow,
            item_type_sets: &item_type_sets,
            removed_status_ids: BTreeSet::new(),
            removed_transition_ids: removed_transitions
                .iter()
                .map(|transition| transition.id)
                .collect(),
            project_names: self.project_names(tenant_id).await?,
        };

        let executor_impacts = self.executor_impacts(&scope, request).await?;

        let result = TransitionImpactAnalysisResult::new(
            workflow_id,
            workflow.name().as_str().to_owned(),
            removed_transitions,
            scope.item_type_set_summaries(),
            executor_impacts,
        );

        info!(
            tenant_id = %tenant_id,
            workflow_id = %workflow_id,
            removed_transitions = result.removed_transitions().len(),
            impacted_permissions = result.impacted_permission_count(),
            impacted_with_assignments = result.impacted_with_assignments_count(),
            "transition removal impact analyzed"
        );

        Ok(result)
    }

    async fn load_workflow(
        &self,
        tenant_id: TenantId,
        workflow_id: WorkflowId,
    ) -> AppResult<Workflow> {
        self.workflow_repository
            .find_workflow(tenant_id, workflow_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "workflow '{workflow_id}' does not exist for tenant '{tenant_id}'"
                ))
            })
    }

    async fn project_names(
        &self,
        tenant_id: TenantId,
    ) -> AppResult<HashMap<ProjectId, String>> {
        Ok(self
            .project_repository
            .list_projects(tenant_id)
            .await?
            .into_iter()
            .map(|project| (project.project_id, project.name))
            .collect())
    }

    fn reject_or_skip(&self, workflow_id: WorkflowId, kind: &str, id: String) -> AppResult<()> {
        match self.membership {
            RemovalMembership::Strict => Err(AppError::NotFound(format!(
                "{kind} '{id}' does not belong to workflow '{workflow_id}'"
            ))),
            RemovalMembership::Lenient => {
                warn!(
                    workflow_id = %workflow_id,
                    kind,
                    id = %id,
                    "requested removal outside workflow skipped"
                );
                Ok(())
            }
        }
    }
}

fn removed_transition(transition: &WorkflowTransition) -> RemovedTransition {
    RemovedTransition {
        id: transition.id,
        name: transition.name.as_str().to_owned(),
        from_status: transition.from_status,
        to_status: transition.to_status,
    }
}
