use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracklane_core::AppError;

/// Granularity at which role assignments for a permission are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionScope {
    /// Assignment keyed by tenant only.
    Tenant,
    /// Assignment additionally keyed by project.
    Project,
}

impl PermissionScope {
    /// Returns a stable storage value for this scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::Project => "project",
        }
    }

    /// Returns all known scopes.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Tenant, Self::Project]
    }
}

impl Display for PermissionScope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Permission families attached to workflow and item-type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PermissionType {
    /// Who may work on items of an item type.
    #[serde(rename = "WorkerPermission")]
    Worker,
    /// Who owns items while they sit in a given status.
    #[serde(rename = "StatusOwnerPermission")]
    StatusOwner,
    /// Who owns a custom field.
    #[serde(rename = "FieldOwnerPermission")]
    FieldOwner,
    /// Who may create items of an item type.
    #[serde(rename = "CreatorPermission")]
    Creator,
    /// Who may execute a workflow transition.
    #[serde(rename = "ExecutorPermission")]
    Executor,
    /// Who may edit a field while an item sits in a given status.
    #[serde(rename = "FieldStatusPermission")]
    FieldStatus,
}

impl PermissionType {
    /// Returns the stable transport name for this permission type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Worker => "WorkerPermission",
            Self::StatusOwner => "StatusOwnerPermission",
            Self::FieldOwner => "FieldOwnerPermission",
            Self::Creator => "CreatorPermission",
            Self::Executor => "ExecutorPermission",
            Self::FieldStatus => "FieldStatusPermission",
        }
    }

    /// Returns all known permission types.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionType] = &[
            PermissionType::Worker,
            PermissionType::StatusOwner,
            PermissionType::FieldOwner,
            PermissionType::Creator,
            PermissionType::Executor,
            PermissionType::FieldStatus,
        ];

        ALL
    }

    /// Returns the position of this type in [`PermissionType::all`].
    #[must_use]
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Worker => 0,
            Self::StatusOwner => 1,
            Self::FieldOwner => 2,
            Self::Creator => 3,
            Self::Executor => 4,
            Self::FieldStatus => 5,
        }
    }

    /// Returns the scope role assignments of this type are stored at.
    ///
    /// Every permission type is tenant-scoped today. Moving one to project scope is a change
    /// to this table only.
    #[must_use]
    pub fn scope(&self) -> PermissionScope {
        match self {
            Self::Worker
            | Self::StatusOwner
            | Self::FieldOwner
            | Self::Creator
            | Self::Executor
            | Self::FieldStatus => PermissionScope::Tenant,
        }
    }

    /// Returns whether projects may override tenant assignments with their own roles.
    #[must_use]
    pub fn supports_project_overrides(&self) -> bool {
        matches!(self, Self::Executor | Self::StatusOwner | Self::FieldStatus)
    }

    /// Returns the transport names of every supported permission type.
    #[must_use]
    pub fn supported_names() -> Vec<String> {
        Self::all()
            .iter()
            .map(|permission_type| permission_type.as_str().to_owned())
            .collect()
    }

    /// Parses a transport value into a permission type.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl Display for PermissionType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PermissionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission_type| permission_type.as_str() == value)
            .ok_or_else(|| AppError::UnknownPermissionType {
                value: value.to_owned(),
                supported: Self::supported_names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;
    use tracklane_core::AppError;

    use super::{PermissionScope, PermissionType};

    #[test]
    fn permission_type_roundtrip_transport_value() {
        for permission_type in PermissionType::all() {
            let restored = PermissionType::from_str(permission_type.as_str());
            assert!(matches!(restored, Ok(value) if value == *permission_type));
        }
    }

    #[test]
    fn ordinals_match_all_order() {
        for (index, permission_type) in PermissionType::all().iter().enumerate() {
            assert_eq!(permission_type.ordinal(), index);
        }
    }

    #[test]
    fn every_permission_type_is_tenant_scoped() {
        assert!(
            PermissionType::all()
                .iter()
                .all(|permission_type| permission_type.scope() == PermissionScope::Tenant)
        );
    }

    #[test]
    fn unknown_permission_type_names_supported_set() {
        let parsed = PermissionType::from_str("UnknownType");
        let Err(AppError::UnknownPermissionType { value, supported }) = parsed else {
            panic!("expected unknown permission type error");
        };
        assert_eq!(value, "UnknownType");
        assert_eq!(
            supported,
            vec![
                "WorkerPermission",
                "StatusOwnerPermission",
                "FieldOwnerPermission",
                "CreatorPermission",
                "ExecutorPermission",
                "FieldStatusPermission",
            ]
        );
    }

    #[test]
    fn serde_uses_transport_names() {
        let encoded = serde_json::to_string(&PermissionType::Executor);
        assert!(matches!(encoded.as_deref(), Ok("\"ExecutorPermission\"")));
    }

    proptest! {
        #[test]
        fn arbitrary_names_outside_the_set_are_rejected(name in "[A-Za-z]{1,24}") {
            let known = PermissionType::all()
                .iter()
                .any(|permission_type| permission_type.as_str() == name);
            prop_assert_eq!(PermissionType::from_str(&name).is_ok(), known);
        }
    }
}
