use tracklane_application::{
    PermissionGrantRepository, ProjectRepository, ProjectSummary, WorkflowRepository,
};
use tracklane_core::{AppError, NonEmptyString, ProjectId, TenantId};
use tracklane_domain::{
    CanvasPosition, GrantTarget, ItemTypeSet, ItemTypeSetId, PermissionGrant,
    PermissionGrantInput, PermissionId, PermissionType, StatusCategory, StatusId, Workflow,
    WorkflowId, WorkflowInput, WorkflowStatus,
};

use super::InMemoryWorkflowConfigurationRepository;

fn single_status_workflow(id: u64) -> Workflow {
    Workflow::new(WorkflowInput {
        id: WorkflowId::new(id),
        name: "Support".to_owned(),
        description: None,
        initial_status: StatusId::new(1),
        statuses: vec![WorkflowStatus {
            id: StatusId::new(1),
            name: NonEmptyString::new("Open").unwrap_or_else(|_| unreachable!()),
            category: StatusCategory::ToDo,
            position: CanvasPosition::default(),
        }],
        transitions: Vec::new(),
    })
    .unwrap_or_else(|_| unreachable!())
}

fn item_type_set(id: u64, workflow_ids: &[u64]) -> ItemTypeSet {
    ItemTypeSet {
        id: ItemTypeSetId::new(id),
        name: NonEmptyString::new(format!("Set {id}")).unwrap_or_else(|_| unreachable!()),
        item_types: vec!["Ticket".to_owned()],
        workflow_ids: workflow_ids.iter().copied().map(WorkflowId::new).collect(),
        project_ids: Vec::new(),
    }
}

fn status_owner_grant(permission_id: u64, set_id: u64) -> PermissionGrant {
    PermissionGrant::new(PermissionGrantInput {
        permission_id: PermissionId::new(permission_id),
        permission_type: PermissionType::StatusOwner,
        item_type_set_id: ItemTypeSetId::new(set_id),
        target: GrantTarget::Status {
            status_id: StatusId::new(1),
        },
    })
    .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn duplicate_workflow_is_a_conflict() {
    let repository = InMemoryWorkflowConfigurationRepository::new();
    let tenant_id = TenantId::new();

    let first = repository
        .save_workflow(tenant_id, single_status_workflow(1))
        .await;
    assert!(first.is_ok());
    let second = repository
        .save_workflow(tenant_id, single_status_workflow(1))
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let other_tenant = repository
        .save_workflow(TenantId::new(), single_status_workflow(1))
        .await;
    assert!(other_tenant.is_ok());
}

#[tokio::test]
async fn item_type_sets_are_listed_per_workflow_and_tenant() {
    let repository = InMemoryWorkflowConfigurationRepository::new();
    let tenant_id = TenantId::new();

    for set in [
        item_type_set(3, &[1]),
        item_type_set(1, &[1, 2]),
        item_type_set(2, &[2]),
    ] {
        let saved = repository.save_item_type_set(tenant_id, set).await;
        assert!(saved.is_ok());
    }
    let foreign = repository
        .save_item_type_set(TenantId::new(), item_type_set(4, &[1]))
        .await;
    assert!(foreign.is_ok());

    let listed = repository
        .list_item_type_sets_for_workflow(tenant_id, WorkflowId::new(1))
        .await
        .unwrap_or_default();
    let ids: Vec<ItemTypeSetId> = listed.iter().map(|set| set.id).collect();
    assert_eq!(ids, vec![ItemTypeSetId::new(1), ItemTypeSetId::new(3)]);
}

#[tokio::test]
async fn grants_are_filtered_by_type_and_item_type_set() {
    let repository = InMemoryWorkflowConfigurationRepository::new();
    let tenant_id = TenantId::new();

    for grant in [
        status_owner_grant(9, 2),
        status_owner_grant(5, 1),
        status_owner_grant(7, 3),
    ] {
        let saved = repository.save_grant(tenant_id, grant).await;
        assert!(saved.is_ok());
    }
    let duplicate = repository
        .save_grant(tenant_id, status_owner_grant(5, 1))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let listed = repository
        .list_grants(
            tenant_id,
            PermissionType::StatusOwner,
            &[ItemTypeSetId::new(1), ItemTypeSetId::new(2)],
        )
        .await
        .unwrap_or_default();
    let ids: Vec<PermissionId> = listed.iter().map(PermissionGrant::permission_id).collect();
    assert_eq!(ids, vec![PermissionId::new(5), PermissionId::new(9)]);

    let executors = repository
        .list_grants(
            tenant_id,
            PermissionType::Executor,
            &[ItemTypeSetId::new(1)],
        )
        .await
        .unwrap_or_default();
    assert!(executors.is_empty());
}

#[tokio::test]
async fn saving_a_project_again_renames_it() {
    let repository = InMemoryWorkflowConfigurationRepository::new();
    let tenant_id = TenantId::new();
    let project_id = ProjectId::new();

    for name in ["Apollo", "Artemis"] {
        let saved = repository
            .save_project(
                tenant_id,
                ProjectSummary {
                    project_id,
                    name: name.to_owned(),
                },
            )
            .await;
        assert!(saved.is_ok());
    }

    let projects = repository
        .list_projects(tenant_id)
        .await
        .unwrap_or_default();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Artemis");
    assert!(
        repository
            .find_workflow(tenant_id, WorkflowId::new(1))
            .await
            .unwrap_or_default()
            .is_none()
    );
}
