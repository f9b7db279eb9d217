//! Tracklane workflow change impact preview.
//!
//! Seeds a tenant's workflow configuration from a JSON fixture and prints the
//! permission fallout of removing statuses or transitions.

#![forbid(unsafe_code)]

mod config;

use std::sync::Arc;

use tracing::info;
use tracklane_application::{
    PermissionRoleStrategyRegistry, PermissionScopeHandler, PermissionScopeRegistry,
    ProjectScopeHandler, ScopeRequest, TenantScopeHandler, WorkflowImpactService,
};
use tracklane_core::{AppError, AppResult};
use tracklane_infrastructure::{
    InMemoryPermissionAssignmentRepository, InMemoryProjectPermissionAssignmentRepository,
    InMemoryWorkflowConfigurationRepository, WorkflowFixture,
};

use crate::config::{ImpactPreviewConfig, RemovalRequest};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    config::init_tracing();

    let config = ImpactPreviewConfig::load()?;
    let configuration = Arc::new(InMemoryWorkflowConfigurationRepository::new());
    let strategies = build_strategies()?;

    WorkflowFixture::load(&config.fixture_path)
        .await?
        .seed(config.tenant_id, &configuration, &strategies)
        .await?;

    let service = WorkflowImpactService::new(
        configuration.clone(),
        configuration.clone(),
        configuration,
        strategies,
    )
    .with_membership(config.membership);
    let request = ScopeRequest::tenant(config.tenant_id);

    info!(
        tenant_id = %config.tenant_id,
        workflow_id = %config.workflow_id,
        fixture = %config.fixture_path.display(),
        "running impact preview"
    );

    let rendered = match &config.removal {
        RemovalRequest::Statuses(status_ids) => {
            let result = service
                .analyze_status_removal(config.workflow_id, status_ids, &request)
                .await?;
            serde_json::to_string_pretty(&result)
        }
        RemovalRequest::Transitions(transition_ids) => {
            let result = service
                .analyze_transition_removal(config.workflow_id, transition_ids, &request)
                .await?;
            serde_json::to_string_pretty(&result)
        }
    }
    .map_err(|error| AppError::Internal(format!("failed to render impact report: {error}")))?;

    println!("{rendered}");
    Ok(())
}

fn build_strategies() -> AppResult<Arc<PermissionRoleStrategyRegistry>> {
    let handlers: Vec<Arc<dyn PermissionScopeHandler>> = vec![
        Arc::new(TenantScopeHandler::new(Arc::new(
            InMemoryPermissionAssignmentRepository::new(),
        ))),
        Arc::new(ProjectScopeHandler::new(Arc::new(
            InMemoryProjectPermissionAssignmentRepository::new(),
        ))),
    ];
    let scope_registry = PermissionScopeRegistry::new(handlers)?;

    Ok(Arc::new(PermissionRoleStrategyRegistry::new(Arc::new(
        scope_registry,
    ))))
}
