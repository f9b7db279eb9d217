use std::path::Path;

use serde::Deserialize;
use tracing::info;
use tracklane_application::{PermissionRoleStrategyRegistry, ProjectSummary, ScopeRequest};
use tracklane_core::{AppError, AppResult, ProjectId, TenantId};
use tracklane_domain::{
    ItemTypeSet, PermissionGrant, PermissionId, PermissionScope, PermissionType, RoleId, Workflow,
};

use crate::InMemoryWorkflowConfigurationRepository;

/// Role binding seeded from a fixture, tenant-wide unless a project is named.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleAssignmentFixture {
    /// Permission family, by transport name.
    pub permission_type: PermissionType,
    /// Permission instance.
    pub permission_id: PermissionId,
    /// Project holding the binding.
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    /// Roles to bind.
    pub role_ids: Vec<RoleId>,
}

/// Workflow configuration snapshot of one tenant, as stored in a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkflowFixture {
    /// Workflows.
    #[serde(default)]
    pub workflows: Vec<Workflow>,
    /// Item-type sets.
    #[serde(default)]
    pub item_type_sets: Vec<ItemTypeSet>,
    /// Permission grants.
    #[serde(default)]
    pub grants: Vec<PermissionGrant>,
    /// Projects.
    #[serde(default)]
    pub projects: Vec<ProjectSummary>,
    /// Role bindings.
    #[serde(default)]
    pub role_assignments: Vec<RoleAssignmentFixture>,
}

impl WorkflowFixture {
    /// Parses and validates a fixture document.
    pub fn from_json(payload: &str) -> AppResult<Self> {
        serde_json::from_str(payload)
            .map_err(|error| AppError::Validation(format!("invalid workflow fixture: {error}")))
    }

    /// Reads and parses a fixture file.
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let payload = tokio::fs::read_to_string(path).await.map_err(|error| {
            AppError::Configuration(format!(
                "failed to read workflow fixture '{}': {error}",
                path.display()
            ))
        })?;

        Self::from_json(&payload)
    }

    /// Stores the snapshot for one tenant. Role bindings go through the strategies.
    pub async fn seed(
        self,
        tenant_id: TenantId,
        configuration: &InMemoryWorkflowConfigurationRepository,
        strategies: &PermissionRoleStrategyRegistry,
    ) -> AppResult<()> {
        let counts = (
            self.workflows.len(),
            self.grants.len(),
            self.role_assignments.len(),
        );

        for workflow in self.workflows {
            configuration.save_workflow(tenant_id, workflow).await?;
        }
        for item_type_set in self.item_type_sets {
            configuration
                .save_item_type_set(tenant_id, item_type_set)
                .await?;
        }
        for grant in self.grants {
            configuration.save_grant(tenant_id, grant).await?;
        }
        for project in self.projects {
            configuration.save_project(tenant_id, project).await?;
        }

        for assignment in self.role_assignments {
            match assignment.project_id {
                None => {
                    let strategy = strategies.strategy(assignment.permission_type)?;
                    let request = ScopeRequest::tenant(tenant_id);
                    for role_id in assignment.role_ids {
                        strategy
                            .assign_role(assignment.permission_id, role_id, &request)
                            .await?;
                    }
                }
                Some(project_id) => {
                    let handler = strategies
                        .scope_registry()
                        .handler(PermissionScope::Project)?;
                    let request = ScopeRequest::project(tenant_id, project_id);
                    for role_id in assignment.role_ids {
                        handler
                            .add_role(
                                assignment.permission_type,
                                assignment.permission_id,
                                role_id,
                                &request,
                            )
                            .await?;
                    }
                }
            }
        }

        info!(
            tenant_id = %tenant_id,
            workflows = counts.0,
            grants = counts.1,
            role_assignments = counts.2,
            "workflow fixture seeded"
        );
        Ok(())
    }
}
