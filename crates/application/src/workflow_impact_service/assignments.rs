use std::collections::{BTreeSet, HashMap};

use tracklane_core::{AppResult, ProjectId};
use tracklane_domain::{PermissionId, PermissionScope, PermissionType, RoleId};

use crate::impact_report::ProjectGrantImpact;
use crate::permission_ports::ScopeRequest;

use super::{RemovalScope, WorkflowImpactService};

/// Role bindings of the impacted grants of one permission family.
#[derive(Default)]
pub(super) struct GrantAssignments {
    tenant: HashMap<PermissionId, BTreeSet<RoleId>>,
    projects: HashMap<PermissionId, Vec<ProjectGrantImpact>>,
}

impl GrantAssignments {
    pub(super) fn tenant_roles(&self, permission_id: PermissionId) -> BTreeSet<RoleId> {
        self.tenant.get(&permission_id).cloned().unwrap_or_default()
    }

    pub(super) fn project_grants(&self, permission_id: PermissionId) -> Vec<ProjectGrantImpact> {
        self.projects
            .get(&permission_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl WorkflowImpactService {
    /// Batch-reads tenant roles and project overrides for the impacted grants.
    pub(super) async fn load_assignments(
        &self,
        scope: &RemovalScope<'_>,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
        request: &ScopeRequest,
    ) -> AppResult<GrantAssignments> {
        if permission_ids.is_empty() {
            return Ok(GrantAssignments::default());
        }

        let tenant = self
            .strategies
            .strategy(permission_type)?
            .assignments(permission_ids, request)
            .await?
            .into_iter()
            .map(|(permission_id, assignment)| (permission_id, assignment.role_ids))
            .collect();

        let mut projects: HashMap<PermissionId, Vec<ProjectGrantImpact>> = HashMap::new();
        if permission_type.supports_project_overrides() {
            let assignments = self
                .strategies
                .scope_registry()
                .handler(PermissionScope::Project)?
                .project_assignments(permission_type, permission_ids, scope.tenant_id)
                .await?;

            for assignment in assignments {
                let Some(project_id) = assignment.project_id else {
                    continue;
                };
                projects
                    .entry(assignment.permission_id)
                    .or_default()
                    .push(ProjectGrantImpact {
                        project_id,
                        project_name: project_name(scope, project_id),
                        assigned_roles: assignment.role_ids,
                    });
            }
        }

        Ok(GrantAssignments { tenant, projects })
    }
}

fn project_name(scope: &RemovalScope<'_>, project_id: ProjectId) -> Option<String> {
    scope.project_names.get(&project_id).cloned()
}
