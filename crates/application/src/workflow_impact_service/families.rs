use tracklane_core::AppResult;
use tracklane_domain::{
    ItemTypeSet, ItemTypeSetSummary, PermissionGrant, PermissionId, PermissionType,
};

use crate::impact_report::{
    ExecutorPermissionImpact, ExecutorTarget, FieldStatusPermissionImpact, FieldStatusTarget,
    PermissionImpact, StatusOwnerPermissionImpact, StatusOwnerTarget,
};
use crate::permission_ports::ScopeRequest;

use super::assignments::GrantAssignments;
use super::{RemovalScope, WorkflowImpactService, preservation};

impl WorkflowImpactService {
    pub(super) async fn status_owner_impacts(
        &self,
        scope: &RemovalScope<'_>,
        request: &ScopeRequest,
    ) -> AppResult<Vec<StatusOwnerPermissionImpact>> {
        let grants = self
            .family_grants(scope, PermissionType::StatusOwner)
            .await?;
        let impacted: Vec<_> = grants
            .iter()
            .filter_map(|grant| {
                let status = grant
                    .status_id()
                    .filter(|status_id| scope.removed_status_ids.contains(status_id))
                    .and_then(|status_id| scope.workflow.status(status_id))?;
                let set = scope.item_type_set(grant.item_type_set_id())?;
                Some((grant, status, set))
            })
            .collect();

        let permission_ids: Vec<PermissionId> = impacted
            .iter()
            .map(|(grant, _, _)| grant.permission_id())
            .collect();
        let assignments = self
            .load_assignments(
                scope,
                PermissionType::StatusOwner,
                &permission_ids,
                request,
            )
            .await?;

        Ok(impacted
            .into_iter()
            .map(|(grant, status, set)| {
                let matched = preservation::status_category_match(
                    scope.workflow,
                    grant,
                    status,
                    &grants,
                    &scope.removed_status_ids,
                );
                let target = StatusOwnerTarget {
                    status_id: status.id,
                    status_name: status.name.as_str().to_owned(),
                    status_category: status.category,
                    status_id_match: matched.map(|candidate| candidate.id),
                    status_name_match: matched.map(|candidate| candidate.name.as_str().to_owned()),
                };
                let can_be_preserved = matched.is_some();
                build_impact(grant, set, target, can_be_preserved, false, &assignments)
            })
            .collect())
    }

    pub(super) async fn executor_impacts(
        &self,
        scope: &RemovalScope<'_>,
        request: &ScopeRequest,
    ) -> AppResult<Vec<ExecutorPermissionImpact>> {
        let grants = self.family_grants(scope, PermissionType::Executor).await?;
        let impacted: Vec<_> = grants
            .iter()
            .filter_map(|grant| {
                let transition = grant
                    .transition_id()
                    .filter(|transition_id| scope.removed_transition_ids.contains(transition_id))
                    .and_then(|transition_id| scope.workflow.transition(transition_id))?;
                let set = scope.item_type_set(grant.item_type_set_id())?;
                Some((grant, transition, set))
            })
            .collect();

        let permission_ids: Vec<PermissionId> = impacted
            .iter()
            .map(|(grant, _, _)| grant.permission_id())
            .collect();
        let assignments = self
            .load_assignments(scope, PermissionType::Executor, &permission_ids, request)
            .await?;

        Ok(impacted
            .into_iter()
            .map(|(grant, transition, set)| {
                let matched = preservation::transition_match(
                    scope.workflow,
                    grant,
                    transition,
                    &grants,
                    &scope.removed_transition_ids,
                );
                let target = ExecutorTarget {
                    transition_id: transition.id,
                    transition_name: transition.name.as_str().to_owned(),
                    from_status: transition.from_status,
                    to_status: transition.to_status,
                    transition_id_match: matched.map(|candidate| candidate.id),
                    transition_name_match: matched
                        .map(|candidate| candidate.name.as_str().to_owned()),
                };
                let can_be_preserved = matched.is_some();
                build_impact(
                    grant,
                    set,
                    target,
                    can_be_preserved,
                    can_be_preserved,
                    &assignments,
                )
            })
            .collect())
    }

    pub(super) async fn field_status_impacts(
        &self,
        scope: &RemovalScope<'_>,
        request: &ScopeRequest,
    ) -> AppResult<Vec<FieldStatusPermissionImpact>> {
        let grants = self
            .family_grants(scope, PermissionType::FieldStatus)
            .await?;
        let impacted: Vec<_> = grants
            .iter()
            .filter_map(|grant| {
                let status = grant
                    .status_id()
                    .filter(|status_id| scope.removed_status_ids.contains(status_id))
                    .and_then(|status_id| scope.workflow.status(status_id))?;
                let (field_id, field_name) = grant.field()?;
                let set = scope.item_type_set(grant.item_type_set_id())?;
                Some((grant, status, field_id, field_name, set))
            })
            .collect();

        let permission_ids: Vec<PermissionId> = impacted
            .iter()
            .map(|(grant, ..)| grant.permission_id())
            .collect();
        let assignments = self
            .load_assignments(
                scope,
                PermissionType::FieldStatus,
                &permission_ids,
                request,
            )
            .await?;

        Ok(impacted
            .into_iter()
            .map(|(grant, status, field_id, field_name, set)| {
                let matched = preservation::field_status_match(
                    scope.workflow,
                    grant,
                    &grants,
                    &scope.removed_status_ids,
                );
                let target = FieldStatusTarget {
                    field_id,
                    field_name: field_name.to_owned(),
                    status_id: status.id,
                    status_name: status.name.as_str().to_owned(),
                    status_id_match: matched,
                };
                let can_be_preserved = matched.is_some();
                build_impact(grant, set, target, can_be_preserved, false, &assignments)
            })
            .collect())
    }

    /// Lists the family's grants on the workflow's item-type sets in a stable order.
    async fn family_grants(
        &self,
        scope: &RemovalScope<'_>,
        permission_type: PermissionType,
    ) -> AppResult<Vec<PermissionGrant>> {
        if scope.item_type_sets.is_empty() {
            return Ok(Vec::new());
        }

        let mut grants = self
            .grant_repository
            .list_grants(scope.tenant_id, permission_type, &scope.item_type_set_ids())
            .await?;
        grants.sort_by_key(|grant| (grant.item_type_set_id(), grant.permission_id()));
        Ok(grants)
    }
}

fn build_impact<T>(
    grant: &PermissionGrant,
    set: &ItemTypeSet,
    target: T,
    can_be_preserved: bool,
    default_preserve: bool,
    assignments: &GrantAssignments,
) -> PermissionImpact<T> {
    let assigned_roles = assignments.tenant_roles(grant.permission_id());

    PermissionImpact {
        permission_id: grant.permission_id(),
        permission_type: grant.permission_type(),
        item_type_set: ItemTypeSetSummary::from(set),
        project_ids: set.project_ids.clone(),
        target,
        has_assignments: !assigned_roles.is_empty(),
        assigned_roles,
        can_be_preserved,
        default_preserve,
        project_grants: assignments.project_grants(grant.permission_id()),
    }
}
