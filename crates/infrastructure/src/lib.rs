//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_permission_assignment_repository;
mod in_memory_workflow_configuration_repository;
mod workflow_fixture;

pub use in_memory_permission_assignment_repository::{
    InMemoryPermissionAssignmentRepository, InMemoryProjectPermissionAssignmentRepository,
};
pub use in_memory_workflow_configuration_repository::InMemoryWorkflowConfigurationRepository;
pub use workflow_fixture::{RoleAssignmentFixture, WorkflowFixture};
