use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;
use tracklane_application::RemovalMembership;
use tracklane_core::{AppError, AppResult, TenantId};
use tracklane_domain::{StatusId, TransitionId, WorkflowId};

/// Topology edit to preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalRequest {
    /// Statuses to remove, with every transition touching them.
    Statuses(Vec<StatusId>),
    /// Transitions to remove.
    Transitions(Vec<TransitionId>),
}

/// Impact preview settings read from `TRACKLANE_*` environment variables.
#[derive(Debug, Clone)]
pub struct ImpactPreviewConfig {
    /// JSON fixture seeded into the in-memory adapters.
    pub fixture_path: PathBuf,
    /// Tenant the fixture is seeded for and the preview runs against.
    pub tenant_id: TenantId,
    /// Workflow being edited.
    pub workflow_id: WorkflowId,
    /// Statuses or transitions to remove.
    pub removal: RemovalRequest,
    /// Handling of requested ids that are not part of the workflow.
    pub membership: RemovalMembership,
}

impl ImpactPreviewConfig {
    /// Loads the configuration from the process environment.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let fixture_path = PathBuf::from(required(&lookup, "TRACKLANE_FIXTURE_PATH")?);

        let tenant_id = required(&lookup, "TRACKLANE_TENANT_ID")?;
        let tenant_id = uuid::Uuid::parse_str(tenant_id.as_str())
            .map(TenantId::from_uuid)
            .map_err(|error| {
                AppError::Validation(format!("invalid TRACKLANE_TENANT_ID: {error}"))
            })?;

        let workflow_id = required(&lookup, "TRACKLANE_WORKFLOW_ID")?;
        let workflow_id = workflow_id.parse::<u64>().map(WorkflowId::new).map_err(|error| {
            AppError::Validation(format!(
                "invalid TRACKLANE_WORKFLOW_ID value '{workflow_id}': {error}"
            ))
        })?;

        let status_ids = optional(&lookup, "TRACKLANE_REMOVE_STATUS_IDS");
        let transition_ids = optional(&lookup, "TRACKLANE_REMOVE_TRANSITION_IDS");
        let removal = match (status_ids, transition_ids) {
            (Some(value), None) => RemovalRequest::Statuses(parse_id_list::<StatusId>(
                "TRACKLANE_REMOVE_STATUS_IDS",
                value.as_str(),
            )?),
            (None, Some(value)) => RemovalRequest::Transitions(parse_id_list::<TransitionId>(
                "TRACKLANE_REMOVE_TRANSITION_IDS",
                value.as_str(),
            )?),
            _ => {
                return Err(AppError::Validation(
                    "exactly one of TRACKLANE_REMOVE_STATUS_IDS or TRACKLANE_REMOVE_TRANSITION_IDS is required"
                        .to_owned(),
                ));
            }
        };

        let membership = match optional(&lookup, "TRACKLANE_STRICT_MEMBERSHIP") {
            None => RemovalMembership::Lenient,
            Some(value) => match bool::from_str(value.to_ascii_lowercase().as_str()) {
                Ok(true) => RemovalMembership::Strict,
                Ok(false) => RemovalMembership::Lenient,
                Err(error) => {
                    return Err(AppError::Validation(format!(
                        "invalid TRACKLANE_STRICT_MEMBERSHIP value '{value}': {error}"
                    )));
                }
            },
        };

        Ok(Self {
            fixture_path,
            tenant_id,
            workflow_id,
            removal,
            membership,
        })
    }
}

/// Installs the stderr subscriber, honoring `RUST_LOG`.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    optional(lookup, name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_id_list<T: From<u64>>(name: &str, value: &str) -> AppResult<Vec<T>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>().map(T::from).map_err(|error| {
                AppError::Validation(format!("invalid {name} entry '{part}': {error}"))
            })
        })
        .collect()
}
