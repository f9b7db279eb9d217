use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracklane_core::{AppResult, ProjectId, TenantId};

/// Project identity used to label project-level grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Project identifier.
    pub project_id: ProjectId,
    /// Project display name.
    pub name: String,
}

/// Read port for tenant projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Lists every project of the tenant.
    async fn list_projects(&self, tenant_id: TenantId) -> AppResult<Vec<ProjectSummary>>;
}
