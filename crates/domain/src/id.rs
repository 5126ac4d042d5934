//! Typed identifier newtypes backed by the repository's opaque id strings.
//!
//! The empty id is meaningful: on a [`FilterCriteria`](crate::criteria::FilterCriteria)
//! field it means "unconstrained", on a content variable it means "untagged".

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether this is the empty ("unset") id.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of an aspect / aspect node.
    AspectId
);

define_id!(
    /// Identifier of a measuring or controlling function.
    FunctionId
);

define_id!(
    /// Identifier of a device class.
    DeviceClassId
);

define_id!(
    /// Identifier of a device type.
    DeviceTypeId
);

define_id!(
    /// Identifier of a service on a device type.
    ServiceId
);

define_id!(
    /// Identifier of a concrete device.
    DeviceId
);

define_id!(
    /// Identifier of a device group.
    DeviceGroupId
);

define_id!(
    /// Identifier of a characteristic.
    CharacteristicId
);

define_id!(
    /// Identifier of a concept.
    ConceptId
);
