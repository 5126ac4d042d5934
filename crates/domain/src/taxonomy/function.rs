//! Functions and device classes.

use serde::{Deserialize, Serialize};

use crate::id::{ConceptId, DeviceClassId, FunctionId};

/// `rdf_type` of functions that observe an aspect.
pub const MEASURING_FUNCTION_TYPE: &str = "https://senergy.infai.org/ontology/MeasuringFunction";

/// `rdf_type` of functions that actuate a device.
pub const CONTROLLING_FUNCTION_TYPE: &str = "https://senergy.infai.org/ontology/ControllingFunction";

/// A measuring or controlling capability a service provides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionType {
    pub id: FunctionId,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub concept_id: ConceptId,
    pub rdf_type: String,
}

impl FunctionType {
    #[must_use]
    pub fn is_measuring(&self) -> bool {
        self.rdf_type == MEASURING_FUNCTION_TYPE
    }

    #[must_use]
    pub fn is_controlling(&self) -> bool {
        self.rdf_type == CONTROLLING_FUNCTION_TYPE
    }
}

/// A kind of device, e.g. "Lamp" or "Thermostat".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceClass {
    pub id: DeviceClassId,
    pub image: String,
    pub name: String,
}
