//! Device types, their services and the content-variable trees that describe
//! each service's inputs and outputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::device::Attribute;
use crate::id::{AspectId, CharacteristicId, DeviceClassId, DeviceTypeId, FunctionId, ServiceId};

/// Separator between a base device-type id and its local modification
/// (`<base-id>$<modifier>`).
pub const MODIFIER_SEPARATOR: char = '$';

/// How a service is used: polled, pushed, or both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interaction {
    #[default]
    #[serde(rename = "request")]
    Request,
    #[serde(rename = "event")]
    Event,
    #[serde(rename = "event+request")]
    EventAndRequest,
}

impl Interaction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Event => "event",
            Self::EventAndRequest => "event+request",
        }
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known interactions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interaction {0:?}")]
pub struct UnknownInteraction(pub String);

impl FromStr for Interaction {
    type Err = UnknownInteraction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(Self::Request),
            "event" => Ok(Self::Event),
            "event+request" => Ok(Self::EventAndRequest),
            other => Err(UnknownInteraction(other.to_string())),
        }
    }
}

/// One node of a service's input/output data-shape tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentVariable {
    pub id: String,
    pub name: String,
    pub is_void: bool,
    pub omit_empty: bool,
    #[serde(rename = "type")]
    pub value_type: String,
    pub sub_content_variables: Vec<ContentVariable>,
    pub characteristic_id: CharacteristicId,
    pub value: Option<serde_json::Value>,
    pub serialization_options: Vec<String>,
    pub unit_reference: String,
    pub function_id: FunctionId,
    pub aspect_id: AspectId,
}

impl ContentVariable {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.sub_content_variables.is_empty()
    }

    /// Walk `SubContentVariables` by name along a dotted path whose first
    /// segment names this node.
    #[must_use]
    pub fn find_path(&self, path: &str) -> Option<&ContentVariable> {
        let mut segments = path.split('.');
        if segments.next()? != self.name {
            return None;
        }
        let mut current = self;
        for segment in segments {
            current = current
                .sub_content_variables
                .iter()
                .find(|child| child.name == segment)?;
        }
        Some(current)
    }
}

/// A serialized message part wrapping one content-variable tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    pub id: String,
    pub content_variable: ContentVariable,
    pub serialization: String,
    pub protocol_segment_id: String,
}

/// A callable/observable function of a device type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub id: ServiceId,
    pub local_id: String,
    pub name: String,
    pub description: String,
    pub interaction: Interaction,
    pub protocol_id: String,
    pub inputs: Vec<Content>,
    pub outputs: Vec<Content>,
    pub attributes: Vec<Attribute>,
    pub service_group_key: String,
}

/// Named grouping of services within a device type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceGroup {
    pub key: String,
    pub name: String,
    pub description: String,
}

/// A model of device together with every service it offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceType {
    pub id: DeviceTypeId,
    pub name: String,
    pub description: String,
    pub service_groups: Vec<ServiceGroup>,
    pub services: Vec<Service>,
    pub device_class_id: DeviceClassId,
    pub attributes: Vec<Attribute>,
}

impl DeviceType {
    /// Whether this is a locally modified variant of a canonical device type.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.id.as_str().contains(MODIFIER_SEPARATOR)
    }

    #[must_use]
    pub fn service(&self, id: &ServiceId) -> Option<&Service> {
        self.services.iter().find(|service| service.id == *id)
    }
}
