mod assignment;
mod repositories;
mod request;

pub use assignment::PermissionAssignment;
pub use repositories::{PermissionAssignmentRepository, ProjectPermissionAssignmentRepository};
pub use request::ScopeRequest;
