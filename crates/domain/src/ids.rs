use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a storage identifier.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the storage identifier.
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Workflow identifier.
    WorkflowId
);
numeric_id!(
    /// Workflow status identifier.
    StatusId
);
numeric_id!(
    /// Workflow transition identifier. Ordering is used for deterministic tie-breaks.
    TransitionId
);
numeric_id!(
    /// Item-type set identifier.
    ItemTypeSetId
);
numeric_id!(
    /// Custom field identifier.
    FieldId
);
numeric_id!(
    /// Permission instance identifier, unique per permission type.
    PermissionId
);
numeric_id!(
    /// Role identifier.
    RoleId
);
