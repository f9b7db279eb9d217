use serde::{Deserialize, Serialize};
use tracklane_core::{NonEmptyString, ProjectId};

use crate::{ItemTypeSetId, WorkflowId};

/// Named grouping of item types sharing workflow and permission configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTypeSet {
    /// Item-type set identifier.
    pub id: ItemTypeSetId,
    /// User-facing name.
    pub name: NonEmptyString,
    /// Item type names in this set.
    #[serde(default)]
    pub item_types: Vec<String>,
    /// Workflows the item types run through.
    #[serde(default)]
    pub workflow_ids: Vec<WorkflowId>,
    /// Projects using this set.
    #[serde(default)]
    pub project_ids: Vec<ProjectId>,
}

impl ItemTypeSet {
    /// Returns whether the set runs its items through the workflow.
    #[must_use]
    pub fn uses_workflow(&self, workflow_id: WorkflowId) -> bool {
        self.workflow_ids.contains(&workflow_id)
    }
}

/// Identity and name of an item-type set, as carried by impact reports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemTypeSetSummary {
    /// Item-type set identifier.
    pub id: ItemTypeSetId,
    /// User-facing name.
    pub name: String,
}

impl From<&ItemTypeSet> for ItemTypeSetSummary {
    fn from(value: &ItemTypeSet) -> Self {
        Self {
            id: value.id,
            name: value.name.as_str().to_owned(),
        }
    }
}
