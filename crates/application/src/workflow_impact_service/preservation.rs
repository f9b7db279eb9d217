//! Replacement lookup for orphaned permissions. Ties resolve to the lowest id.

use std::collections::BTreeSet;

use tracklane_domain::{
    PermissionGrant, StatusId, TransitionId, Workflow, WorkflowStatus, WorkflowTransition,
};

/// Surviving status sharing the removed status category that keeps a status-owner grant
/// in the same item-type set.
pub(super) fn status_category_match<'a>(
    workflow: &'a Workflow,
    grant: &PermissionGrant,
    removed: &WorkflowStatus,
    status_owner_grants: &[PermissionGrant],
    removed_status_ids: &BTreeSet<StatusId>,
) -> Option<&'a WorkflowStatus> {
    workflow
        .statuses()
        .iter()
        .filter(|candidate| {
            !removed_status_ids.contains(&candidate.id)
                && candidate.category == removed.category
                && has_grant_in_set(status_owner_grants, grant, |other| {
                    other.status_id() == Some(candidate.id)
                })
        })
        .min_by_key(|candidate| candidate.id)
}

/// Surviving transition connecting the same ordered status pair that keeps an executor
/// grant in the same item-type set.
pub(super) fn transition_match<'a>(
    workflow: &'a Workflow,
    grant: &PermissionGrant,
    removed: &WorkflowTransition,
    executor_grants: &[PermissionGrant],
    removed_transition_ids: &BTreeSet<TransitionId>,
) -> Option<&'a WorkflowTransition> {
    workflow
        .transitions()
        .iter()
        .filter(|candidate| {
            !removed_transition_ids.contains(&candidate.id)
                && candidate.connects_same_statuses(removed)
                && has_grant_in_set(executor_grants, grant, |other| {
                    other.transition_id() == Some(candidate.id)
                })
        })
        .min_by_key(|candidate| candidate.id)
}

/// Surviving status where the same field keeps a grant in the same item-type set.
pub(super) fn field_status_match(
    workflow: &Workflow,
    grant: &PermissionGrant,
    field_status_grants: &[PermissionGrant],
    removed_status_ids: &BTreeSet<StatusId>,
) -> Option<StatusId> {
    let (field_id, _) = grant.field()?;

    field_status_grants
        .iter()
        .filter(|candidate| {
            candidate.permission_id() != grant.permission_id()
                && candidate.item_type_set_id() == grant.item_type_set_id()
                && candidate.field().is_some_and(|(id, _)| id == field_id)
        })
        .filter_map(PermissionGrant::status_id)
        .filter(|status_id| {
            !removed_status_ids.contains(status_id) && workflow.status(*status_id).is_some()
        })
        .min()
}

fn has_grant_in_set(
    grants: &[PermissionGrant],
    grant: &PermissionGrant,
    targets_candidate: impl Fn(&PermissionGrant) -> bool,
) -> bool {
    grants.iter().any(|other| {
        other.permission_id() != grant.permission_id()
            && other.item_type_set_id() == grant.item_type_set_id()
            && targets_candidate(other)
    })
}
