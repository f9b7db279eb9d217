use serde::{Deserialize, Serialize};
use tracklane_core::{AppError, AppResult};

use crate::{FieldId, ItemTypeSetId, PermissionId, PermissionType, StatusId, TransitionId};

/// Configuration entity a permission instance is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrantTarget {
    /// The item-type set as a whole.
    ItemTypeSet,
    /// A custom field.
    Field {
        /// Field identifier.
        field_id: FieldId,
        /// Field display name.
        field_name: String,
    },
    /// A workflow status.
    Status {
        /// Status identifier.
        status_id: StatusId,
    },
    /// A workflow transition.
    Transition {
        /// Transition identifier.
        transition_id: TransitionId,
    },
    /// A field while the item sits in a status.
    FieldStatus {
        /// Field identifier.
        field_id: FieldId,
        /// Field display name.
        field_name: String,
        /// Status identifier.
        status_id: StatusId,
    },
}

impl GrantTarget {
    fn kind(&self) -> &'static str {
        match self {
            Self::ItemTypeSet => "item_type_set",
            Self::Field { .. } => "field",
            Self::Status { .. } => "status",
            Self::Transition { .. } => "transition",
            Self::FieldStatus { .. } => "field_status",
        }
    }
}

/// Permission instance bound to one configuration entity of an item-type set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PermissionGrantInput")]
pub struct PermissionGrant {
    permission_id: PermissionId,
    permission_type: PermissionType,
    item_type_set_id: ItemTypeSetId,
    target: GrantTarget,
}

/// Unvalidated grant payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrantInput {
    /// Permission instance identifier.
    pub permission_id: PermissionId,
    /// Permission family.
    pub permission_type: PermissionType,
    /// Owning item-type set.
    pub item_type_set_id: ItemTypeSetId,
    /// Attached entity.
    pub target: GrantTarget,
}

impl PermissionGrant {
    /// Creates a grant after checking the target kind fits the permission family.
    pub fn new(input: PermissionGrantInput) -> AppResult<Self> {
        let PermissionGrantInput {
            permission_id,
            permission_type,
            item_type_set_id,
            target,
        } = input;

        let fits = matches!(
            (permission_type, &target),
            (
                PermissionType::Worker | PermissionType::Creator,
                GrantTarget::ItemTypeSet
            ) | (PermissionType::FieldOwner, GrantTarget::Field { .. })
                | (PermissionType::StatusOwner, GrantTarget::Status { .. })
                | (PermissionType::Executor, GrantTarget::Transition { .. })
                | (PermissionType::FieldStatus, GrantTarget::FieldStatus { .. })
        );

        if !fits {
            return Err(AppError::Validation(format!(
                "permission '{permission_id}' of type '{permission_type}' cannot target a {}",
                target.kind()
            )));
        }

        Ok(Self {
            permission_id,
            permission_type,
            item_type_set_id,
            target,
        })
    }

    /// Returns the permission instance identifier.
    #[must_use]
    pub fn permission_id(&self) -> PermissionId {
        self.permission_id
    }

    /// Returns the permission family.
    #[must_use]
    pub fn permission_type(&self) -> PermissionType {
        self.permission_type
    }

    /// Returns the owning item-type set.
    #[must_use]
    pub fn item_type_set_id(&self) -> ItemTypeSetId {
        self.item_type_set_id
    }

    /// Returns the attached entity.
    #[must_use]
    pub fn target(&self) -> &GrantTarget {
        &self.target
    }

    /// Returns the status the grant is defined on, if any.
    #[must_use]
    pub fn status_id(&self) -> Option<StatusId> {
        match &self.target {
            GrantTarget::Status { status_id } | GrantTarget::FieldStatus { status_id, .. } => {
                Some(*status_id)
            }
            _ => None,
        }
    }

    /// Returns the transition the grant is defined on, if any.
    #[must_use]
    pub fn transition_id(&self) -> Option<TransitionId> {
        match &self.target {
            GrantTarget::Transition { transition_id } => Some(*transition_id),
            _ => None,
        }
    }

    /// Returns the field the grant is defined on, if any.
    #[must_use]
    pub fn field(&self) -> Option<(FieldId, &str)> {
        match &self.target {
            GrantTarget::Field {
                field_id,
                field_name,
            }
            | GrantTarget::FieldStatus {
                field_id,
                field_name,
                ..
            } => Some((*field_id, field_name.as_str())),
            _ => None,
        }
    }
}

impl TryFrom<PermissionGrantInput> for PermissionGrant {
    type Error = AppError;

    fn try_from(value: PermissionGrantInput) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{GrantTarget, PermissionGrant, PermissionGrantInput};
    use crate::{FieldId, ItemTypeSetId, PermissionId, PermissionType, StatusId, TransitionId};

    #[test]
    fn executor_grant_requires_transition_target() {
        let grant = PermissionGrant::new(PermissionGrantInput {
            permission_id: PermissionId::new(1),
            permission_type: PermissionType::Executor,
            item_type_set_id: ItemTypeSetId::new(1),
            target: GrantTarget::Status {
                status_id: StatusId::new(1),
            },
        });
        assert!(grant.is_err());
    }

    #[test]
    fn field_status_grant_exposes_field_and_status() {
        let grant = PermissionGrant::new(PermissionGrantInput {
            permission_id: PermissionId::new(5),
            permission_type: PermissionType::FieldStatus,
            item_type_set_id: ItemTypeSetId::new(1),
            target: GrantTarget::FieldStatus {
                field_id: FieldId::new(3),
                field_name: "Estimate".to_owned(),
                status_id: StatusId::new(2),
            },
        })
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(grant.status_id(), Some(StatusId::new(2)));
        assert_eq!(grant.field(), Some((FieldId::new(3), "Estimate")));
        assert_eq!(grant.transition_id(), None);
    }

    #[test]
    fn transition_grant_parses_from_json() {
        let grant = serde_json::from_value::<PermissionGrant>(serde_json::json!({
            "permission_id": 9,
            "permission_type": "ExecutorPermission",
            "item_type_set_id": 1,
            "target": {"kind": "transition", "transition_id": 12}
        }));
        assert!(matches!(
            grant.map(|value| value.transition_id()),
            Ok(Some(id)) if id == TransitionId::new(12)
        ));
    }
}
