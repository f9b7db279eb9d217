use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracklane_core::{AppError, AppResult, NonEmptyString};

use crate::{StatusId, TransitionId, WorkflowId};

/// Coarse lifecycle bucket a status belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    /// Work has not started.
    ToDo,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Done,
}

impl StatusCategory {
    /// Returns stable category value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "to_do",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

/// Canvas coordinates of a status node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasPosition {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

/// Side of a status node a transition edge attaches to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSide {
    /// Top edge.
    Top,
    /// Right edge.
    #[default]
    Right,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
}

/// One workflow status node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStatus {
    /// Status identifier.
    pub id: StatusId,
    /// User-facing status name.
    pub name: NonEmptyString,
    /// Lifecycle category.
    pub category: StatusCategory,
    /// Layout position.
    #[serde(default)]
    pub position: CanvasPosition,
}

/// One directed workflow transition edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTransition {
    /// Transition identifier.
    pub id: TransitionId,
    /// User-facing transition name.
    pub name: NonEmptyString,
    /// Source status.
    pub from_status: StatusId,
    /// Target status.
    pub to_status: StatusId,
    /// Anchor on the source node.
    #[serde(default)]
    pub from_anchor: AnchorSide,
    /// Anchor on the target node.
    #[serde(default)]
    pub to_anchor: AnchorSide,
}

impl WorkflowTransition {
    /// Returns whether the edge starts or ends at the status.
    #[must_use]
    pub fn touches(&self, status_id: StatusId) -> bool {
        self.from_status == status_id || self.to_status == status_id
    }

    /// Returns whether both edges connect the same ordered status pair.
    #[must_use]
    pub fn connects_same_statuses(&self, other: &Self) -> bool {
        self.from_status == other.from_status && self.to_status == other.to_status
    }
}

/// Input payload used to construct a validated workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowInput {
    /// Workflow identifier.
    pub id: WorkflowId,
    /// User-facing workflow name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Status new items start in.
    pub initial_status: StatusId,
    /// Status nodes in display order.
    pub statuses: Vec<WorkflowStatus>,
    /// Transition edges in display order.
    pub transitions: Vec<WorkflowTransition>,
}

/// Tenant-scoped workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkflowInput")]
pub struct Workflow {
    id: WorkflowId,
    name: NonEmptyString,
    description: Option<String>,
    initial_status: StatusId,
    statuses: Vec<WorkflowStatus>,
    transitions: Vec<WorkflowTransition>,
}

impl Workflow {
    /// Creates a validated workflow graph.
    pub fn new(input: WorkflowInput) -> AppResult<Self> {
        let WorkflowInput {
            id,
            name,
            description,
            initial_status,
            statuses,
            transitions,
        } = input;

        if statuses.is_empty() {
            return Err(AppError::Validation(format!(
                "workflow '{id}' must define at least one status"
            )));
        }

        let mut status_ids = BTreeSet::new();
        for status in &statuses {
            if !status_ids.insert(status.id) {
                return Err(AppError::Validation(format!(
                    "workflow '{id}' defines status '{}' more than once",
                    status.id
                )));
            }
        }

        if !status_ids.contains(&initial_status) {
            return Err(AppError::Validation(format!(
                "workflow '{id}' initial status '{initial_status}' is not a workflow status"
            )));
        }

        let mut transition_ids = BTreeSet::new();
        for transition in &transitions {
            if !transition_ids.insert(transition.id) {
                return Err(AppError::Validation(format!(
                    "workflow '{id}' defines transition '{}' more than once",
                    transition.id
                )));
            }

            for endpoint in [transition.from_status, transition.to_status] {
                if !status_ids.contains(&endpoint) {
                    return Err(AppError::Validation(format!(
                        "transition '{}' references status '{endpoint}' outside workflow '{id}'",
                        transition.id
                    )));
                }
            }
        }

        let description = description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            description,
            initial_status,
            statuses,
            transitions,
        })
    }

    /// Returns workflow identifier.
    #[must_use]
    pub fn id(&self) -> WorkflowId {
        self.id
    }

    /// Returns workflow name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns optional workflow description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the status new items start in.
    #[must_use]
    pub fn initial_status(&self) -> StatusId {
        self.initial_status
    }

    /// Returns status nodes.
    #[must_use]
    pub fn statuses(&self) -> &[WorkflowStatus] {
        &self.statuses
    }

    /// Returns transition edges.
    #[must_use]
    pub fn transitions(&self) -> &[WorkflowTransition] {
        &self.transitions
    }

    /// Finds a status by id.
    #[must_use]
    pub fn status(&self, status_id: StatusId) -> Option<&WorkflowStatus> {
        self.statuses.iter().find(|status| status.id == status_id)
    }

    /// Finds a transition by id.
    #[must_use]
    pub fn transition(&self, transition_id: TransitionId) -> Option<&WorkflowTransition> {
        self.transitions
            .iter()
            .find(|transition| transition.id == transition_id)
    }

    /// Returns every transition starting or ending at one of the statuses, keyed by id.
    #[must_use]
    pub fn transitions_touching(
        &self,
        status_ids: &BTreeSet<StatusId>,
    ) -> BTreeMap<TransitionId, &WorkflowTransition> {
        self.transitions
            .iter()
            .filter(|transition| {
                status_ids.contains(&transition.from_status)
                    || status_ids.contains(&transition.to_status)
            })
            .map(|transition| (transition.id, transition))
            .collect()
    }
}

impl TryFrom<WorkflowInput> for Workflow {
    type Error = AppError;

    fn try_from(value: WorkflowInput) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Workflow> for WorkflowInput {
    fn from(value: Workflow) -> Self {
        Self {
            id: value.id,
            name: value.name.into(),
            description: value.description,
            initial_status: value.initial_status,
            statuses: value.statuses,
            transitions: value.transitions,
        }
    }
}
