use std::sync::Arc;

use async_trait::async_trait;
use tracklane_core::{AppError, ProjectId, TenantId};
use tracklane_domain::{PermissionId, PermissionScope, PermissionType, RoleId};

use crate::permission_ports::ScopeRequest;
use crate::test_support::{FakeAssignmentRepository, FakeProjectAssignmentRepository, Harness};

use super::{
    PermissionScopeHandler, PermissionScopeRegistry, ProjectScopeHandler, TenantScopeHandler,
};

struct ReadOnlyHandler;

#[async_trait]
impl PermissionScopeHandler for ReadOnlyHandler {
    fn scope(&self) -> PermissionScope {
        PermissionScope::Tenant
    }
}

fn tenant_handler() -> Arc<dyn PermissionScopeHandler> {
    Arc::new(TenantScopeHandler::new(Arc::new(
        FakeAssignmentRepository::default(),
    )))
}

fn project_handler() -> Arc<dyn PermissionScopeHandler> {
    Arc::new(ProjectScopeHandler::new(Arc::new(
        FakeProjectAssignmentRepository::default(),
    )))
}

#[test]
fn registry_resolves_each_registered_scope() {
    let registry = PermissionScopeRegistry::new(vec![project_handler(), tenant_handler()])
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        registry.scopes(),
        vec![PermissionScope::Tenant, PermissionScope::Project]
    );
    for scope in PermissionScope::all() {
        let handler = registry.handler(*scope);
        assert!(matches!(handler, Ok(handler) if handler.scope() == *scope));
    }
}

#[test]
fn duplicate_scope_registration_fails_at_startup() {
    let registry = PermissionScopeRegistry::new(vec![tenant_handler(), tenant_handler()]);
    assert!(matches!(registry, Err(AppError::Configuration(_))));
}

#[test]
fn missing_scope_handler_is_a_configuration_error() {
    let registry =
        PermissionScopeRegistry::new(vec![tenant_handler()]).unwrap_or_else(|_| unreachable!());
    let handler = registry.handler(PermissionScope::Project);
    assert!(matches!(handler, Err(AppError::Configuration(_))));
}

#[tokio::test]
async fn unimplemented_capability_is_unsupported() {
    let handler = ReadOnlyHandler;
    let request = ScopeRequest::tenant(TenantId::new());

    let result = handler
        .add_role(
            PermissionType::Worker,
            PermissionId::new(1),
            RoleId::new(1),
            &request,
        )
        .await;
    assert!(matches!(result, Err(AppError::Unsupported(_))));

    let listed = handler
        .assignments(PermissionType::Worker, &[PermissionId::new(1)], &request)
        .await;
    assert!(matches!(listed, Err(AppError::Unsupported(_))));
}

#[tokio::test]
async fn tenant_handler_does_not_list_project_assignments() {
    let result = tenant_handler()
        .project_assignments(PermissionType::Executor, &[PermissionId::new(1)], TenantId::new())
        .await;
    assert!(matches!(result, Err(AppError::Unsupported(_))));
}

#[tokio::test]
async fn project_scope_requires_project_id() {
    let handler = project_handler();
    let request = ScopeRequest::tenant(TenantId::new());

    let listed = handler
        .assignments(PermissionType::Executor, &[PermissionId::new(1)], &request)
        .await;
    assert!(matches!(listed, Err(AppError::InvalidRequest(_))));

    let added = handler
        .add_role(
            PermissionType::Executor,
            PermissionId::new(1),
            RoleId::new(1),
            &request,
        )
        .await;
    assert!(matches!(added, Err(AppError::InvalidRequest(_))));

    let deleted = handler
        .delete_assignment(PermissionType::Executor, PermissionId::new(1), &request)
        .await;
    assert!(matches!(deleted, Err(AppError::InvalidRequest(_))));
}

#[tokio::test]
async fn tenant_scope_succeeds_with_tenant_only() {
    let handler = tenant_handler();
    let request = ScopeRequest::tenant(TenantId::new());

    let added = handler
        .add_role(
            PermissionType::Executor,
            PermissionId::new(1),
            RoleId::new(1),
            &request,
        )
        .await;
    assert!(added.is_ok());

    let listed = handler
        .assignments(
            PermissionType::Executor,
            &[PermissionId::new(1), PermissionId::new(2)],
            &request,
        )
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[&PermissionId::new(1)].role_ids.len(), 1);
    assert!(listed[&PermissionId::new(2)].is_empty());
}

#[tokio::test]
async fn project_assignments_are_isolated_per_project() {
    let harness = Harness::new();
    let left = ProjectId::new();
    let right = ProjectId::new();
    let registry = harness.strategies.scope_registry();
    let handler = registry
        .handler(PermissionScope::Project)
        .unwrap_or_else(|_| unreachable!());

    for (project_id, role) in [(left, 1), (left, 1), (right, 2)] {
        let result = handler
            .add_role(
                PermissionType::Executor,
                PermissionId::new(5),
                RoleId::new(role),
                &ScopeRequest::project(harness.tenant_id, project_id),
            )
            .await;
        assert!(result.is_ok());
    }

    assert_eq!(
        harness
            .project_roles(left, PermissionType::Executor, 5)
            .await
            .into_iter()
            .collect::<Vec<_>>(),
        vec![RoleId::new(1)]
    );

    let removed = handler
        .remove_role(
            PermissionType::Executor,
            PermissionId::new(5),
            RoleId::new(7),
            &ScopeRequest::project(harness.tenant_id, right),
        )
        .await;
    assert!(removed.is_ok());

    let listed = handler
        .project_assignments(
            PermissionType::Executor,
            &[PermissionId::new(5)],
            harness.tenant_id,
        )
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|assignment| assignment.role_ids.len() == 1));

    let other_tenant = handler
        .project_assignments(
            PermissionType::Executor,
            &[PermissionId::new(5)],
            TenantId::new(),
        )
        .await
        .unwrap_or_default();
    assert!(other_tenant.is_empty());
}
