mod grants;
mod projects;
mod repository;

pub use grants::PermissionGrantRepository;
pub use projects::{ProjectRepository, ProjectSummary};
pub use repository::WorkflowRepository;
