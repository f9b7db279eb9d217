//! Application services and ports.

#![forbid(unsafe_code)]

mod impact_report;
mod permission_cleanup_service;
mod permission_ports;
mod permission_role_strategy;
mod permission_scope;
mod workflow_impact_service;
mod workflow_ports;

#[cfg(test)]
mod test_support;

pub use impact_report::{
    ExecutorPermissionImpact, ExecutorTarget, FieldStatusPermissionImpact, FieldStatusTarget,
    PermissionImpact, ProjectGrantImpact, RemovedStatus, RemovedTransition,
    StatusImpactAnalysisParts, StatusImpactAnalysisResult, StatusOwnerPermissionImpact,
    StatusOwnerTarget, TransitionImpactAnalysisResult,
};
pub use permission_cleanup_service::{
    CleanupReport, PermissionCleanupService, PreservationDecisions,
};
pub use permission_ports::{
    PermissionAssignment, PermissionAssignmentRepository, ProjectPermissionAssignmentRepository,
    ScopeRequest,
};
pub use permission_role_strategy::{PermissionRoleStrategy, PermissionRoleStrategyRegistry};
pub use permission_scope::{
    PermissionScopeHandler, PermissionScopeRegistry, ProjectScopeHandler, TenantScopeHandler,
};
pub use workflow_impact_service::{RemovalMembership, WorkflowImpactService};
pub use workflow_ports::{
    PermissionGrantRepository, ProjectRepository, ProjectSummary, WorkflowRepository,
};
