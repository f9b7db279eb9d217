use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracklane_core::ProjectId;
use tracklane_domain::{
    FieldId, ItemTypeSetSummary, PermissionId, PermissionType, RoleId, StatusCategory, StatusId,
    TransitionId, WorkflowId,
};

/// Status selected for removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedStatus {
    /// Status identifier.
    pub id: StatusId,
    /// Status name.
    pub name: String,
    /// Status category.
    pub category: StatusCategory,
}

/// Transition removed directly or as a consequence of a status removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedTransition {
    /// Transition identifier.
    pub id: TransitionId,
    /// Transition name.
    pub name: String,
    /// Source status.
    pub from_status: StatusId,
    /// Target status.
    pub to_status: StatusId,
}

/// Project-level override of a tenant-level grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectGrantImpact {
    /// Project holding the override.
    pub project_id: ProjectId,
    /// Project name when known.
    pub project_name: Option<String>,
    /// Roles bound in the project.
    pub assigned_roles: BTreeSet<RoleId>,
}

/// Status an orphaned status-owner permission is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusOwnerTarget {
    /// Removed status.
    pub status_id: StatusId,
    /// Removed status name.
    pub status_name: String,
    /// Category used to look for a replacement.
    pub status_category: StatusCategory,
    /// Surviving status of the same category with the lowest id.
    pub status_id_match: Option<StatusId>,
    /// Name of the matched status.
    pub status_name_match: Option<String>,
}

/// Transition an orphaned executor permission is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutorTarget {
    /// Removed transition.
    pub transition_id: TransitionId,
    /// Removed transition name.
    pub transition_name: String,
    /// Source status of the removed transition.
    pub from_status: StatusId,
    /// Target status of the removed transition.
    pub to_status: StatusId,
    /// Surviving transition between the same statuses with the lowest id.
    pub transition_id_match: Option<TransitionId>,
    /// Name of the matched transition.
    pub transition_name_match: Option<String>,
}

/// Field and status an orphaned field-status permission is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldStatusTarget {
    /// Field identifier.
    pub field_id: FieldId,
    /// Field name.
    pub field_name: String,
    /// Removed status.
    pub status_id: StatusId,
    /// Removed status name.
    pub status_name: String,
    /// Surviving status where the field keeps a permission, lowest id first.
    pub status_id_match: Option<StatusId>,
}

/// Impact of a workflow change on one permission instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionImpact<T> {
    /// Permission instance.
    pub permission_id: PermissionId,
    /// Permission family.
    pub permission_type: PermissionType,
    /// Owning item-type set.
    pub item_type_set: ItemTypeSetSummary,
    /// Projects using the owning item-type set.
    pub project_ids: Vec<ProjectId>,
    /// Entity the permission is attached to.
    pub target: T,
    /// Roles bound at tenant level.
    pub assigned_roles: BTreeSet<RoleId>,
    /// Whether any tenant-level role is bound.
    pub has_assignments: bool,
    /// Whether an equivalent surviving entity exists.
    pub can_be_preserved: bool,
    /// Preservation choice proposed to the operator.
    pub default_preserve: bool,
    /// Project-level overrides of this permission.
    pub project_grants: Vec<ProjectGrantImpact>,
}

impl<T> PermissionImpact<T> {
    /// Returns whether removing the permission drops any role binding.
    #[must_use]
    pub fn drops_bindings(&self) -> bool {
        self.has_assignments || !self.project_grants.is_empty()
    }
}

/// Impact on a status-owner permission.
pub type StatusOwnerPermissionImpact = PermissionImpact<StatusOwnerTarget>;
/// Impact on an executor permission.
pub type ExecutorPermissionImpact = PermissionImpact<ExecutorTarget>;
/// Impact on a field-status permission.
pub type FieldStatusPermissionImpact = PermissionImpact<FieldStatusTarget>;

/// Preview of removing statuses from a workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusImpactAnalysisResult {
    workflow_id: WorkflowId,
    workflow_name: String,
    removed_statuses: Vec<RemovedStatus>,
    removed_transitions: Vec<RemovedTransition>,
    affected_item_type_sets: Vec<ItemTypeSetSummary>,
    status_owner_impacts: Vec<StatusOwnerPermissionImpact>,
    executor_impacts: Vec<ExecutorPermissionImpact>,
    field_status_impacts: Vec<FieldStatusPermissionImpact>,
    analyzed_at: DateTime<Utc>,
}

/// Parts of a status removal preview.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusImpactAnalysisParts {
    /// Analyzed workflow.
    pub workflow_id: WorkflowId,
    /// Analyzed workflow name.
    pub workflow_name: String,
    /// Removed statuses.
    pub removed_statuses: Vec<RemovedStatus>,
    /// Removed transitions.
    pub removed_transitions: Vec<RemovedTransition>,
    /// Item-type sets bound to the workflow.
    pub affected_item_type_sets: Vec<ItemTypeSetSummary>,
    /// Status-owner impacts.
    pub status_owner_impacts: Vec<StatusOwnerPermissionImpact>,
    /// Executor impacts.
    pub executor_impacts: Vec<ExecutorPermissionImpact>,
    /// Field-status impacts.
    pub field_status_impacts: Vec<FieldStatusPermissionImpact>,
}

impl StatusImpactAnalysisResult {
    /// Freezes the parts into a report stamped with the current time.
    #[must_use]
    pub fn new(parts: StatusImpactAnalysisParts) -> Self {
        Self {
            workflow_id: parts.workflow_id,
            workflow_name: parts.workflow_name,
            removed_statuses: parts.removed_statuses,
            removed_transitions: parts.removed_transitions,
            affected_item_type_sets: parts.affected_item_type_sets,
            status_owner_impacts: parts.status_owner_impacts,
            executor_impacts: parts.executor_impacts,
            field_status_impacts: parts.field_status_impacts,
            analyzed_at: Utc::now(),
        }
    }

    /// Returns the analyzed workflow.
    #[must_use]
    pub fn workflow_id(&self) -> WorkflowId {
        self.workflow_id
    }

    /// Returns the analyzed workflow name.
    #[must_use]
    pub fn workflow_name(&self) -> &str {
        self.workflow_name.as_str()
    }

    /// Returns removed statuses in workflow order.
    #[must_use]
    pub fn removed_statuses(&self) -> &[RemovedStatus] {
        &self.removed_statuses
    }

    /// Returns removed status ids.
    #[must_use]
    pub fn removed_status_ids(&self) -> BTreeSet<StatusId> {
        self.removed_statuses.iter().map(|status| status.id).collect()
    }

    /// Returns removed status names.
    #[must_use]
    pub fn removed_status_names(&self) -> Vec<&str> {
        self.removed_statuses
            .iter()
            .map(|status| status.name.as_str())
            .collect()
    }

    /// Returns transitions removed along with the statuses.
    #[must_use]
    pub fn removed_transitions(&self) -> &[RemovedTransition] {
        &self.removed_transitions
    }

    /// Returns removed transition ids.
    #[must_use]
    pub fn removed_transition_ids(&self) -> BTreeSet<TransitionId> {
        self.removed_transitions
            .iter()
            .map(|transition| transition.id)
            .collect()
    }

    /// Returns removed transition names.
    #[must_use]
    pub fn removed_transition_names(&self) -> Vec<&str> {
        self.removed_transitions
            .iter()
            .map(|transition| transition.name.as_str())
            .collect()
    }

    /// Returns every item-type set bound to the workflow.
    #[must_use]
    pub fn affected_item_type_sets(&self) -> &[ItemTypeSetSummary] {
        &self.affected_item_type_sets
    }

    /// Returns status-owner impacts.
    #[must_use]
    pub fn status_owner_impacts(&self) -> &[StatusOwnerPermissionImpact] {
        &self.status_owner_impacts
    }

    /// Returns executor impacts.
    #[must_use]
    pub fn executor_impacts(&self) -> &[ExecutorPermissionImpact] {
        &self.executor_impacts
    }

    /// Returns field-status impacts.
    #[must_use]
    pub fn field_status_impacts(&self) -> &[FieldStatusPermissionImpact] {
        &self.field_status_impacts
    }

    /// Returns when the preview was computed.
    #[must_use]
    pub fn analyzed_at(&self) -> DateTime<Utc> {
        self.analyzed_at
    }

    /// Returns the number of impacted permission instances.
    #[must_use]
    pub fn impacted_permission_count(&self) -> usize {
        self.status_owner_impacts.len()
            + self.executor_impacts.len()
            + self.field_status_impacts.len()
    }

    /// Returns the number of impacted permission instances that still bind roles.
    #[must_use]
    pub fn impacted_with_assignments_count(&self) -> usize {
        self.status_owner_impacts
            .iter()
            .filter(|impact| impact.drops_bindings())
            .count()
            + self
                .executor_impacts
                .iter()
                .filter(|impact| impact.drops_bindings())
                .count()
            + self
                .field_status_impacts
                .iter()
                .filter(|impact| impact.drops_bindings())
                .count()
    }

    /// Returns whether the removal drops any role binding.
    #[must_use]
    pub fn has_impact(&self) -> bool {
        self.impacted_with_assignments_count() > 0
    }
}

/// Preview of removing transitions from a workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionImpactAnalysisResult {
    workflow_id: WorkflowId,
    workflow_name: String,
    removed_transitions: Vec<RemovedTransition>,
    affected_item_type_sets: Vec<ItemTypeSetSummary>,
    executor_impacts: Vec<ExecutorPermissionImpact>,
    analyzed_at: DateTime<Utc>,
}

impl TransitionImpactAnalysisResult {
    /// Freezes the parts into a report stamped with the current time.
    #[must_use]
    pub fn new(
        workflow_id: WorkflowId,
        workflow_name: String,
        removed_transitions: Vec<RemovedTransition>,
        affected_item_type_sets: Vec<ItemTypeSetSummary>,
        executor_impacts: Vec<ExecutorPermissionImpact>,
    ) -> Self {
        Self {
            workflow_id,
            workflow_name,
            removed_transitions,
            affected_item_type_sets,
            executor_impacts,
            analyzed_at: Utc::now(),
        }
    }

    /// Returns the analyzed workflow.
    #[must_use]
    pub fn workflow_id(&self) -> WorkflowId {
        self.workflow_id
    }

    /// Returns the analyzed workflow name.
    #[must_use]
    pub fn workflow_name(&self) -> &str {
        self.workflow_name.as_str()
    }

    /// Returns removed transitions in workflow order.
    #[must_use]
    pub fn removed_transitions(&self) -> &[RemovedTransition] {
        &self.removed_transitions
    }

    /// Returns removed transition ids.
    #[must_use]
    pub fn removed_transition_ids(&self) -> BTreeSet<TransitionId> {
        self.removed_transitions
            .iter()
            .map(|transition| transition.id)
            .collect()
    }

    /// Returns removed transition names.
    #[must_use]
    pub fn removed_transition_names(&self) -> Vec<&str> {
        self.removed_transitions
            .iter()
            .map(|transition| transition.name.as_str())
            .collect()
    }

    /// Returns every item-type set bound to the workflow.
    #[must_use]
    pub fn affected_item_type_sets(&self) -> &[ItemTypeSetSummary] {
        &self.affected_item_type_sets
    }

    /// Returns executor impacts.
    #[must_use]
    pub fn executor_impacts(&self) -> &[ExecutorPermissionImpact] {
        &self.executor_impacts
    }

    /// Returns when the preview was computed.
    #[must_use]
    pub fn analyzed_at(&self) -> DateTime<Utc> {
        self.analyzed_at
    }

    /// Returns the number of impacted permission instances.
    #[must_use]
    pub fn impacted_permission_count(&self) -> usize {
        self.executor_impacts.len()
    }

    /// Returns the number of impacted permission instances that still bind roles.
    #[must_use]
    pub fn impacted_with_assignments_count(&self) -> usize {
        self.executor_impacts
            .iter()
            .filter(|impact| impact.drops_bindings())
            .count()
    }

    /// Returns whether the removal drops any role binding.
    #[must_use]
    pub fn has_impact(&self) -> bool {
        self.impacted_with_assignments_count() > 0
    }
}
