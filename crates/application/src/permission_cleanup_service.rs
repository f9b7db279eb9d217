use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};
use tracklane_core::{AppError, AppResult, ProjectId};
use tracklane_domain::{
    ItemTypeSetId, PermissionGrant, PermissionId, PermissionScope, PermissionType, RoleId,
};

use crate::impact_report::{
    PermissionImpact, StatusImpactAnalysisResult, TransitionImpactAnalysisResult,
};
use crate::permission_ports::ScopeRequest;
use crate::permission_role_strategy::PermissionRoleStrategyRegistry;
use crate::workflow_ports::PermissionGrantRepository;

/// Operator choices on which orphaned permissions keep their roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreservationDecisions {
    overrides: HashMap<(PermissionType, PermissionId), bool>,
}

impl PreservationDecisions {
    /// Accepts every impact's proposed default.
    #[must_use]
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Moves the permission's roles to its matched replacement.
    #[must_use]
    pub fn preserve(
        mut self,
        permission_type: PermissionType,
        permission_id: PermissionId,
    ) -> Self {
        self.overrides.insert((permission_type, permission_id), true);
        self
    }

    /// Drops the permission's roles without remapping.
    #[must_use]
    pub fn discard(
        mut self,
        permission_type: PermissionType,
        permission_id: PermissionId,
    ) -> Self {
        self.overrides.insert((permission_type, permission_id), false);
        self
    }

    fn preserves<T>(&self, impact: &PermissionImpact<T>) -> bool {
        self.overrides
            .get(&(impact.permission_type, impact.permission_id))
            .copied()
            .unwrap_or(impact.default_preserve)
    }
}

/// Outcome of applying a reviewed removal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Permissions whose roles moved to a replacement.
    pub remapped_permissions: usize,
    /// Role bindings written on replacements, tenant and project level.
    pub remapped_role_bindings: usize,
    /// Permissions whose assignments were deleted.
    pub deleted_permissions: usize,
}

/// One orphaned permission to clear, optionally remapping its roles first.
struct CleanupStep {
    permission_id: PermissionId,
    remap_to: Option<PermissionId>,
    tenant_roles: BTreeSet<RoleId>,
    project_grants: Vec<(ProjectId, BTreeSet<RoleId>)>,
}

/// Applies a reviewed impact report: remaps preserved roles, then clears orphaned assignments.
#[derive(Clone)]
pub struct PermissionCleanupService {
    grant_repository: Arc<dyn PermissionGrantRepository>,
    strategies: Arc<PermissionRoleStrategyRegistry>,
}

impl PermissionCleanupService {
    /// Creates a cleanup service.
    #[must_use]
    pub fn new(
        grant_repository: Arc<dyn PermissionGrantRepository>,
        strategies: Arc<PermissionRoleStrategyRegistry>,
    ) -> Self {
        Self {
            grant_repository,
            strategies,
        }
    }

    /// Applies a transition removal preview.
    pub async fn apply_transition_removal(
        &self,
        result: &TransitionImpactAnalysisResult,
        decisions: &PreservationDecisions,
        request: &ScopeRequest,
    ) -> AppResult<CleanupReport> {
        let executor_steps = self
            .plan(
                PermissionType::Executor,
                result.executor_impacts(),
                decisions,
                request,
                |impact, grant| {
                    impact.target.transition_id_match.is_some_and(|transition_id| {
                        grant.transition_id() == Some(transition_id)
                    })
                },
            )
            .await?;

        let mut report = CleanupReport::default();
        self.execute(PermissionType::Executor, executor_steps, request, &mut report)
            .await?;

        info!(
            tenant_id = %request.tenant_id(),
            workflow_id = %result.workflow_id(),
            remapped = report.remapped_permissions,
            deleted = report.deleted_permissions,
            "transition removal cleanup applied"
        );
        Ok(report)
    }

    /// Applies a status removal preview across every affected family.
    pub async fn apply_status_removal(
        &self,
        result: &StatusImpactAnalysisResult,
        decisions: &PreservationDecisions,
        request: &ScopeRequest,
    ) -> AppResult<CleanupReport> {
        // Every family is validated before the first write.
        let status_owner_steps = self
            .plan(
                PermissionType::StatusOwner,
                result.status_owner_impacts(),
                decisions,
                request,
                |impact, grant| {
                    impact
                        .target
                        .status_id_match
                        .is_some_and(|status_id| grant.status_id() == Some(status_id))
                },
            )
            .await?;
        let executor_steps = self
            .plan(
                PermissionType::Executor,
                result.executor_impacts(),
                decisions,
                request,
                |impact, grant| {
                    impact.target.transition_id_match.is_some_and(|transition_id| {
                        grant.transition_id() == Some(transition_id)
                    })
                },
            )
            .await?;
        let field_status_steps = self
            .plan(
                PermissionType::FieldStatus,
                result.field_status_impacts(),
                decisions,
                request,
                |impact, grant| {
                    impact.target.status_id_match.is_some_and(|status_id| {
                        grant.status_id() == Some(status_id)
                            && grant
                                .field()
                                .is_some_and(|(field_id, _)| field_id == impact.target.field_id)
                    })
                },
            )
            .await?;

        let mut report = CleanupReport::default();
        self.execute(
            PermissionType::StatusOwner,
            status_owner_steps,
            request,
            &mut report,
        )
        .await?;
        self.execute(PermissionType::Executor, executor_steps, request, &mut report)
            .await?;
        self.execute(
            PermissionType::FieldStatus,
            field_status_steps,
            request,
            &mut report,
        )
        .await?;

        info!(
            tenant_id = %request.tenant_id(),
            workflow_id = %result.workflow_id(),
            remapped = report.remapped_permissions,
            deleted = report.deleted_permissions,
            "status removal cleanup applied"
        );
        Ok(report)
    }

    async fn plan<T, F>(
        &self,
        permission_type: PermissionType,
        impacts: &[PermissionImpact<T>],
        decisions: &PreservationDecisions,
        request: &ScopeRequest,
        is_replacement: F,
    ) -> AppResult<Vec<CleanupStep>>
    where
        F: Fn(&PermissionImpact<T>, &PermissionGrant) -> bool,
    {
        for impact in impacts {
            if decisions.preserves(impact) && !impact.can_be_preserved {
                return Err(AppError::InvalidRequest(format!(
                    "{permission_type} permission '{}' has no replacement to preserve onto",
                    impact.permission_id
                )));
            }
        }

        let item_type_set_ids: Vec<ItemTypeSetId> = impacts
            .iter()
            .map(|impact| impact.item_type_set.id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let grants = if item_type_set_ids.is_empty() {
            Vec::new()
        } else {
            self.grant_repository
                .list_grants(request.tenant_id(), permission_type, &item_type_set_ids)
                .await?
        };

        let mut steps = Vec::new();
        for impact in impacts.iter().filter(|impact| impact.drops_bindings()) {
            let remap_to = if decisions.preserves(impact) {
                let replacement = grants
                    .iter()
                    .find(|grant| {
                        grant.item_type_set_id() == impact.item_type_set.id
                            && is_replacement(impact, grant)
                    })
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            "no {permission_type} replacement for '{}' in item type set '{}'",
                            impact.permission_id, impact.item_type_set.id
                        ))
                    })?;
                Some(replacement.permission_id())
            } else {
                None
            };

            steps.push(CleanupStep {
                permission_id: impact.permission_id,
                remap_to,
                tenant_roles: impact.assigned_roles.clone(),
                project_grants: impact
                    .project_grants
                    .iter()
                    .map(|grant| (grant.project_id, grant.assigned_roles.clone()))
                    .collect(),
            });
        }

        Ok(steps)
    }

    async fn execute(
        &self,
        permission_type: PermissionType,
        steps: Vec<CleanupStep>,
        request: &ScopeRequest,
        report: &mut CleanupReport,
    ) -> AppResult<()> {
        if steps.is_empty() {
            return Ok(());
        }

        let tenant_id = request.tenant_id();
        let tenant_request = ScopeRequest::tenant(tenant_id);
        let strategy = self.strategies.strategy(permission_type)?;

        for step in steps {
            if let Some(target) = step.remap_to {
                for role_id in &step.tenant_roles {
                    strategy.assign_role(target, *role_id, &tenant_request).await?;
                    report.remapped_role_bindings += 1;
                }
                for (project_id, role_ids) in &step.project_grants {
                    let project_request = ScopeRequest::project(tenant_id, *project_id);
                    let handler = self
                        .strategies
                        .scope_registry()
                        .handler(PermissionScope::Project)?;
                    for role_id in role_ids {
                        handler
                            .add_role(permission_type, target, *role_id, &project_request)
                            .await?;
                        report.remapped_role_bindings += 1;
                    }
                }
                report.remapped_permissions += 1;
                debug!(
                    permission_type = %permission_type,
                    from = %step.permission_id,
                    to = %target,
                    "permission roles remapped"
                );
            }

            strategy
                .delete_assignment(step.permission_id, &tenant_request)
                .await?;
            for (project_id, _) in &step.project_grants {
                self.strategies
                    .scope_registry()
                    .handler(PermissionScope::Project)?
                    .delete_assignment(
                        permission_type,
                        step.permission_id,
                        &ScopeRequest::project(tenant_id, *project_id),
                    )
                    .await?;
            }
            report.deleted_permissions += 1;
        }

        Ok(())
    }
}
