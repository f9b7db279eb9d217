//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod grant;
mod ids;
mod item_type_set;
mod security;
mod workflow;

pub use grant::{GrantTarget, PermissionGrant, PermissionGrantInput};
pub use ids::{FieldId, ItemTypeSetId, PermissionId, RoleId, StatusId, TransitionId, WorkflowId};
pub use item_type_set::{ItemTypeSet, ItemTypeSetSummary};
pub use security::{PermissionScope, PermissionType};
pub use workflow::{
    AnchorSide, CanvasPosition, StatusCategory, Workflow, WorkflowInput, WorkflowStatus,
    WorkflowTransition,
};
