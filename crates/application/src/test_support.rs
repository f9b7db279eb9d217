use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tracklane_core::{AppResult, NonEmptyString, ProjectId, TenantId};
use tracklane_domain::{
    AnchorSide, CanvasPosition, FieldId, GrantTarget, ItemTypeSet, ItemTypeSetId, PermissionGrant,
    PermissionGrantInput, PermissionId, PermissionType, RoleId, StatusCategory, StatusId,
    TransitionId, Workflow, WorkflowId, WorkflowInput, WorkflowStatus, WorkflowTransition,
};

use crate::permission_ports::{
    PermissionAssignmentRepository, ProjectPermissionAssignmentRepository,
};
use crate::workflow_ports::{
    PermissionGrantRepository, ProjectRepository, ProjectSummary, WorkflowRepository,
};
use crate::{
    PermissionRoleStrategyRegistry, PermissionScopeHandler, PermissionScopeRegistry,
    ProjectScopeHandler, TenantScopeHandler,
};

type TenantKey = (TenantId, PermissionType, PermissionId);
type ProjectKey = (TenantId, ProjectId, PermissionType, PermissionId);

#[derive(Default)]
pub(crate) struct FakeAssignmentRepository {
    pub(crate) roles: Mutex<HashMap<TenantKey, BTreeSet<RoleId>>>,
}

#[async_trait]
impl PermissionAssignmentRepository for FakeAssignmentRepository {
    async fn list_role_ids(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
    ) -> AppResult<HashMap<PermissionId, BTreeSet<RoleId>>> {
        let roles = self.roles.lock().await;
        Ok(permission_ids
            .iter()
            .filter_map(|permission_id| {
                roles
                    .get(&(tenant_id, permission_type, *permission_id))
                    .map(|role_ids| (*permission_id, role_ids.clone()))
            })
            .collect())
    }

    async fn add_role(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()> {
        self.roles
            .lock()
            .await
            .entry((tenant_id, permission_type, permission_id))
            .or_default()
            .insert(role_id);
        Ok(())
    }

    async fn remove_role(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()> {
        if let Some(role_ids) = self
            .roles
            .lock()
            .await
            .get_mut(&(tenant_id, permission_type, permission_id))
        {
            role_ids.remove(&role_id);
        }
        Ok(())
    }

    async fn delete_assignment(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.roles
            .lock()
            .await
            .remove(&(tenant_id, permission_type, permission_id));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeProjectAssignmentRepository {
    pub(crate) roles: Mutex<HashMap<ProjectKey, BTreeSet<RoleId>>>,
}

#[async_trait]
impl ProjectPermissionAssignmentRepository for FakeProjectAssignmentRepository {
    async fn list_role_ids(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
    ) -> AppResult<HashMap<PermissionId, BTreeSet<RoleId>>> {
        let roles = self.roles.lock().await;
        Ok(permission_ids
            .iter()
            .filter_map(|permission_id| {
                roles
                    .get(&(tenant_id, project_id, permission_type, *permission_id))
                    .map(|role_ids| (*permission_id, role_ids.clone()))
            })
            .collect())
    }

    async fn list_project_role_ids(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<(ProjectId, PermissionId, BTreeSet<RoleId>)>> {
        let roles = self.roles.lock().await;
        Ok(roles
            .iter()
            .filter(|((stored_tenant, _, stored_type, stored_permission), _)| {
                stored_tenant == &tenant_id
                    && stored_type == &permission_type
                    && permission_ids.contains(stored_permission)
            })
            .map(|((_, project_id, _, permission_id), role_ids)| {
                (*project_id, *permission_id, role_ids.clone())
            })
            .collect())
    }

    async fn add_role(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()> {
        self.roles
            .lock()
            .await
            .entry((tenant_id, project_id, permission_type, permission_id))
            .or_default()
            .insert(role_id);
        Ok(())
    }

    async fn remove_role(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> AppResult<()> {
        if let Some(role_ids) = self.roles.lock().await.get_mut(&(
            tenant_id,
            project_id,
            permission_type,
            permission_id,
        )) {
            role_ids.remove(&role_id);
        }
        Ok(())
    }

    async fn delete_assignment(
        &self,
        tenant_id: TenantId,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.roles
            .lock()
            .await
            .remove(&(tenant_id, project_id, permission_type, permission_id));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeConfigurationRepository {
    pub(crate) workflows: Mutex<HashMap<(TenantId, WorkflowId), Workflow>>,
    pub(crate) item_type_sets: Mutex<Vec<(TenantId, ItemTypeSet)>>,
    pub(crate) grants: Mutex<Vec<(TenantId, PermissionGrant)>>,
    pub(crate) projects: Mutex<Vec<(TenantId, ProjectSummary)>>,
}

#[async_trait]
impl WorkflowRepository for FakeConfigurationRepository {
    async fn find_workflow(
        &self,
        tenant_id: TenantId,
        workflow_id: WorkflowId,
    ) -> AppResult<Option<Workflow>> {
        Ok(self
            .workflows
            .lock()
            .await
            .get(&(tenant_id, workflow_id))
            .cloned())
    }

    async fn list_item_type_sets_for_workflow(
        &self,
        tenant_id: TenantId,
        workflow_id: WorkflowId,
    ) -> AppResult<Vec<ItemTypeSet>> {
        Ok(self
            .item_type_sets
            .lock()
            .await
            .iter()
            .filter(|(stored_tenant, set)| {
                stored_tenant == &tenant_id && set.uses_workflow(workflow_id)
            })
            .map(|(_, set)| set.clone())
            .collect())
    }
}

#[async_trait]
impl PermissionGrantRepository for FakeConfigurationRepository {
    async fn list_grants(
        &self,
        tenant_id: TenantId,
        permission_type: PermissionType,
        item_type_set_ids: &[ItemTypeSetId],
    ) -> AppResult<Vec<PermissionGrant>> {
        Ok(self
            .grants
            .lock()
            .await
            .iter()
            .filter(|(stored_tenant, grant)| {
                stored_tenant == &tenant_id
                    && grant.permission_type() == permission_type
                    && item_type_set_ids.contains(&grant.item_type_set_id())
            })
            .map(|(_, grant)| grant.clone())
            .collect())
    }
}

#[async_trait]
impl ProjectRepository for FakeConfigurationRepository {
    async fn list_projects(&self, tenant_id: TenantId) -> AppResult<Vec<ProjectSummary>> {
        Ok(self
            .projects
            .lock()
            .await
            .iter()
            .filter(|(stored_tenant, _)| stored_tenant == &tenant_id)
            .map(|(_, project)| project.clone())
            .collect())
    }
}

pub(crate) struct Harness {
    pub(crate) tenant_id: TenantId,
    pub(crate) assignments: Arc<FakeAssignmentRepository>,
    pub(crate) project_assignments: Arc<FakeProjectAssignmentRepository>,
    pub(crate) configuration: Arc<FakeConfigurationRepository>,
    pub(crate) strategies: Arc<PermissionRoleStrategyRegistry>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let assignments = Arc::new(FakeAssignmentRepository::default());
        let project_assignments = Arc::new(FakeProjectAssignmentRepository::default());
        let handlers: Vec<Arc<dyn PermissionScopeHandler>> = vec![
            Arc::new(TenantScopeHandler::new(assignments.clone())),
            Arc::new(ProjectScopeHandler::new(project_assignments.clone())),
        ];
        let scope_registry =
            PermissionScopeRegistry::new(handlers).unwrap_or_else(|_| unreachable!());

        Self {
            tenant_id: TenantId::new(),
            assignments,
            project_assignments,
            configuration: Arc::new(FakeConfigurationRepository::default()),
            strategies: Arc::new(PermissionRoleStrategyRegistry::new(Arc::new(scope_registry))),
        }
    }

    pub(crate) async fn add_workflow(&self, workflow: Workflow) {
        self.configuration
            .workflows
            .lock()
            .await
            .insert((self.tenant_id, workflow.id()), workflow);
    }

    pub(crate) async fn add_item_type_set(&self, set: ItemTypeSet) {
        self.configuration
            .item_type_sets
            .lock()
            .await
            .push((self.tenant_id, set));
    }

    pub(crate) async fn add_grant(&self, grant: PermissionGrant) {
        self.configuration
            .grants
            .lock()
            .await
            .push((self.tenant_id, grant));
    }

    pub(crate) async fn add_project(&self, project_id: ProjectId, name: &str) {
        self.configuration.projects.lock().await.push((
            self.tenant_id,
            ProjectSummary {
                project_id,
                name: name.to_owned(),
            },
        ));
    }

    pub(crate) async fn bind_roles(
        &self,
        permission_type: PermissionType,
        permission_id: u64,
        role_ids: &[u64],
    ) {
        self.assignments.roles.lock().await.insert(
            (
                self.tenant_id,
                permission_type,
                PermissionId::new(permission_id),
            ),
            role_ids.iter().copied().map(RoleId::new).collect(),
        );
    }

    pub(crate) async fn bind_project_roles(
        &self,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_id: u64,
        role_ids: &[u64],
    ) {
        self.project_assignments.roles.lock().await.insert(
            (
                self.tenant_id,
                project_id,
                permission_type,
                PermissionId::new(permission_id),
            ),
            role_ids.iter().copied().map(RoleId::new).collect(),
        );
    }

    pub(crate) async fn tenant_roles(
        &self,
        permission_type: PermissionType,
        permission_id: u64,
    ) -> BTreeSet<RoleId> {
        self.assignments
            .roles
            .lock()
            .await
            .get(&(
                self.tenant_id,
                permission_type,
                PermissionId::new(permission_id),
            ))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) async fn project_roles(
        &self,
        project_id: ProjectId,
        permission_type: PermissionType,
        permission_id: u64,
    ) -> BTreeSet<RoleId> {
        self.project_assignments
            .roles
            .lock()
            .await
            .get(&(
                self.tenant_id,
                project_id,
                permission_type,
                PermissionId::new(permission_id),
            ))
            .cloned()
            .unwrap_or_default()
    }
}

pub(crate) fn text(value: &str) -> NonEmptyString {
    NonEmptyString::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn status(id: u64, name: &str, category: StatusCategory) -> WorkflowStatus {
    WorkflowStatus {
        id: StatusId::new(id),
        name: text(name),
        category,
        position: CanvasPosition::default(),
    }
}

pub(crate) fn transition(id: u64, name: &str, from: u64, to: u64) -> WorkflowTransition {
    WorkflowTransition {
        id: TransitionId::new(id),
        name: text(name),
        from_status: StatusId::new(from),
        to_status: StatusId::new(to),
        from_anchor: AnchorSide::Right,
        to_anchor: AnchorSide::Left,
    }
}

pub(crate) fn workflow(
    id: u64,
    statuses: Vec<WorkflowStatus>,
    transitions: Vec<WorkflowTransition>,
) -> Workflow {
    let initial_status = statuses
        .first()
        .map(|status| status.id)
        .unwrap_or(StatusId::new(0));
    Workflow::new(WorkflowInput {
        id: WorkflowId::new(id),
        name: format!("Workflow {id}"),
        description: None,
        initial_status,
        statuses,
        transitions,
    })
    .unwrap_or_else(|_| unreachable!())
}

/// Open(1, to do) -> In Progress(2) -> Done(3), transitions 10 and 11.
pub(crate) fn delivery_workflow() -> Workflow {
    workflow(
        1,
        vec![
            status(1, "Open", StatusCategory::ToDo),
            status(2, "In Progress", StatusCategory::InProgress),
            status(3, "Done", StatusCategory::Done),
        ],
        vec![
            transition(10, "Start", 1, 2),
            transition(11, "Finish", 2, 3),
        ],
    )
}

pub(crate) fn item_type_set(
    id: u64,
    workflow_id: u64,
    project_ids: Vec<ProjectId>,
) -> ItemTypeSet {
    ItemTypeSet {
        id: ItemTypeSetId::new(id),
        name: text(&format!("Set {id}")),
        item_types: vec!["Bug".to_owned(), "Task".to_owned()],
        workflow_ids: vec![WorkflowId::new(workflow_id)],
        project_ids,
    }
}

fn grant(
    permission_id: u64,
    permission_type: PermissionType,
    set_id: u64,
    target: GrantTarget,
) -> PermissionGrant {
    PermissionGrant::new(PermissionGrantInput {
        permission_id: PermissionId::new(permission_id),
        permission_type,
        item_type_set_id: ItemTypeSetId::new(set_id),
        target,
    })
    .unwrap_or_else(|_| unreachable!())
}

pub(crate) fn executor_grant(
    permission_id: u64,
    set_id: u64,
    transition_id: u64,
) -> PermissionGrant {
    grant(
        permission_id,
        PermissionType::Executor,
        set_id,
        GrantTarget::Transition {
            transition_id: TransitionId::new(transition_id),
        },
    )
}

pub(crate) fn status_owner_grant(
    permission_id: u64,
    set_id: u64,
    status_id: u64,
) -> PermissionGrant {
    grant(
        permission_id,
        PermissionType::StatusOwner,
        set_id,
        GrantTarget::Status {
            status_id: StatusId::new(status_id),
        },
    )
}

pub(crate) fn field_status_grant(
    permission_id: u64,
    set_id: u64,
    field_id: u64,
    status_id: u64,
) -> PermissionGrant {
    grant(
        permission_id,
        PermissionType::FieldStatus,
        set_id,
        GrantTarget::FieldStatus {
            field_id: FieldId::new(field_id),
            field_name: format!("Field {field_id}"),
            status_id: StatusId::new(status_id),
        },
    )
}
