//! Devices and the records that group or locate them.

use serde::{Deserialize, Serialize};

use crate::criteria::FilterCriteria;
use crate::id::{DeviceGroupId, DeviceId, DeviceTypeId};

/// Free-form key/value metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    pub key: String,
    pub value: String,
    pub origin: String,
}

/// A concrete device instance of some [`DeviceType`](crate::device_type::DeviceType).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    pub id: DeviceId,
    pub local_id: String,
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub device_type_id: DeviceTypeId,
    pub owner_id: String,
}

/// A user-defined set of devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceGroup {
    pub id: DeviceGroupId,
    pub name: String,
    pub image: String,
    pub criteria: Vec<FilterCriteria>,
    pub device_ids: Vec<DeviceId>,
    pub criteria_short: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub auto_generated_by_device: String,
}

/// A gateway that connects local devices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hub {
    pub id: String,
    pub name: String,
    pub hash: String,
    pub device_local_ids: Vec<String>,
    pub device_ids: Vec<DeviceId>,
    pub owner_id: String,
}

/// A place that devices and device groups are assigned to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub device_ids: Vec<DeviceId>,
    pub device_group_ids: Vec<DeviceGroupId>,
}
