//! IoT options: the selection a user made for a smart-service input.
//!
//! On the wire an option is a record with four nullable fields of which at
//! most one is set. In memory it is a sum type; a record with no field set
//! is [`IotOption::Unrecognized`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::error::{MalformedInputError, ScriptEnvError};
use crate::id::{CharacteristicId, DeviceGroupId, DeviceId, ServiceId};
use crate::selectable::DeviceTypeSelectable;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSelection {
    pub device_id: DeviceId,
    #[serde(default)]
    pub service_id: Option<ServiceId>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub characteristic_id: Option<CharacteristicId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGroupSelection {
    pub id: DeviceGroupId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSelection {
    pub id: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub characteristic_id: Option<CharacteristicId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericEventSource {
    pub filter_type: String,
    pub filter_ids: String,
    pub topic: String,
    pub path: String,
    pub characteristic_id: Option<CharacteristicId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IotOptionWire", into = "IotOptionWire")]
pub enum IotOption {
    Device(DeviceSelection),
    DeviceGroup(DeviceGroupSelection),
    Import(ImportSelection),
    GenericEventSource(GenericEventSource),
    /// No selection field was set.
    Unrecognized,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct IotOptionWire {
    device_selection: Option<DeviceSelection>,
    device_group_selection: Option<DeviceGroupSelection>,
    import_selection: Option<ImportSelection>,
    generic_event_source: Option<GenericEventSource>,
}

impl TryFrom<IotOptionWire> for IotOption {
    type Error = MalformedInputError;

    fn try_from(wire: IotOptionWire) -> Result<Self, Self::Error> {
        let mut set = Vec::with_capacity(1);
        if let Some(selection) = wire.device_selection {
            set.push(("device_selection", Self::Device(selection)));
        }
        if let Some(selection) = wire.device_group_selection {
            set.push(("device_group_selection", Self::DeviceGroup(selection)));
        }
        if let Some(selection) = wire.import_selection {
            set.push(("import_selection", Self::Import(selection)));
        }
        if let Some(source) = wire.generic_event_source {
            set.push(("generic_event_source", Self::GenericEventSource(source)));
        }
        if set.len() > 1 {
            let fields: Vec<&str> = set.iter().map(|(field, _)| *field).collect();
            return Err(MalformedInputError::AmbiguousIotOption(fields.join(", ")));
        }
        Ok(set.pop().map_or(Self::Unrecognized, |(_, option)| option))
    }
}

impl From<IotOption> for IotOptionWire {
    fn from(option: IotOption) -> Self {
        let mut wire = Self::default();
        match option {
            IotOption::Device(selection) => wire.device_selection = Some(selection),
            IotOption::DeviceGroup(selection) => wire.device_group_selection = Some(selection),
            IotOption::Import(selection) => wire.import_selection = Some(selection),
            IotOption::GenericEventSource(source) => wire.generic_event_source = Some(source),
            IotOption::Unrecognized => {}
        }
        wire
    }
}

impl IotOption {
    /// Decode the serialized form used by scripts.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::MalformedInput`] for invalid JSON or a
    /// record with more than one selection set.
    pub fn decode(raw: &str) -> Result<Self, ScriptEnvError> {
        serde_json::from_str(raw).map_err(|err| MalformedInputError::Json(err).into())
    }

    /// A device selection, optionally narrowed to one service.
    #[must_use]
    pub fn device(device_id: impl Into<DeviceId>, service_id: Option<ServiceId>) -> Self {
        Self::Device(DeviceSelection {
            device_id: device_id.into(),
            service_id,
            ..DeviceSelection::default()
        })
    }

    #[must_use]
    pub fn is_device(&self) -> bool {
        matches!(self, Self::Device(_))
    }

    #[must_use]
    pub fn is_device_group(&self) -> bool {
        matches!(self, Self::DeviceGroup(_))
    }

    #[must_use]
    pub fn is_import(&self) -> bool {
        matches!(self, Self::Import(_))
    }

    #[must_use]
    pub fn is_generic_event_source(&self) -> bool {
        matches!(self, Self::GenericEventSource(_))
    }

    #[must_use]
    pub fn device_id(&self) -> Option<&DeviceId> {
        match self {
            Self::Device(selection) => Some(&selection.device_id),
            _ => None,
        }
    }

    #[must_use]
    pub fn service_id(&self) -> Option<&ServiceId> {
        match self {
            Self::Device(selection) => selection.service_id.as_ref(),
            _ => None,
        }
    }
}

/// Bucket options by device id. Options that are not device selections go
/// under the empty key; each bucket keeps input order.
#[must_use]
pub fn group_by_device(options: &[IotOption]) -> BTreeMap<String, Vec<IotOption>> {
    group_by(options, |option| option.device_id().map(ToString::to_string))
}

/// Bucket options by service id. Device selections without a service and
/// non-device options go under the empty key; each bucket keeps input order.
#[must_use]
pub fn group_by_service(options: &[IotOption]) -> BTreeMap<String, Vec<IotOption>> {
    group_by(options, |option| option.service_id().map(ToString::to_string))
}

fn group_by(
    options: &[IotOption],
    key: impl Fn(&IotOption) -> Option<String>,
) -> BTreeMap<String, Vec<IotOption>> {
    let mut groups: BTreeMap<String, Vec<IotOption>> = BTreeMap::new();
    for option in options {
        groups
            .entry(key(option).unwrap_or_default())
            .or_default()
            .push(option.clone());
    }
    groups
}

/// One device selection per matching service of `device`'s device type, or
/// one per path option when the service has any.
#[must_use]
pub fn expand_device(device: &Device, selectables: &[DeviceTypeSelectable]) -> Vec<IotOption> {
    let mut result = Vec::new();
    for selectable in selectables
        .iter()
        .filter(|s| s.device_type_id == device.device_type_id)
    {
        for service in &selectable.services {
            let path_options = selectable
                .service_path_options
                .get(&service.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if path_options.is_empty() {
                result.push(IotOption::device(device.id.clone(), Some(service.id.clone())));
                continue;
            }
            for path_option in path_options {
                result.push(IotOption::Device(DeviceSelection {
                    device_id: device.id.clone(),
                    service_id: Some(service.id.clone()),
                    path: (!path_option.path.is_empty()).then(|| path_option.path.clone()),
                    characteristic_id: (!path_option.characteristic_id.is_empty())
                        .then(|| path_option.characteristic_id.clone()),
                }));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_type::Service;
    use crate::error::ErrorKind;
    use crate::id::DeviceTypeId;
    use crate::selectable::ServicePathOption;

    fn group(id: &str) -> IotOption {
        IotOption::DeviceGroup(DeviceGroupSelection {
            id: DeviceGroupId::from(id),
        })
    }

    #[test]
    fn should_classify_exactly_one_variant() {
        let options = [
            IotOption::device("d1", None),
            group("g1"),
            IotOption::Import(ImportSelection::default()),
            IotOption::GenericEventSource(GenericEventSource::default()),
            IotOption::Unrecognized,
        ];
        for option in &options {
            let flags = [
                option.is_device(),
                option.is_device_group(),
                option.is_import(),
                option.is_generic_event_source(),
            ];
            assert!(flags.iter().filter(|f| **f).count() <= 1);
        }
        assert!(options[0].is_device());
        assert!(options[1].is_device_group());
        assert!(options[2].is_import());
        assert!(!options[4].is_device());
    }

    #[test]
    fn should_decode_wire_form_into_variant() {
        let option = IotOption::decode(r#"{"device_selection":{"device_id":"d1","service_id":"s1"}}"#)
            .unwrap();
        assert_eq!(option.device_id().map(DeviceId::as_str), Some("d1"));
        assert_eq!(option.service_id().map(ServiceId::as_str), Some("s1"));

        let nothing = IotOption::decode(r#"{"device_selection":null}"#).unwrap();
        assert_eq!(nothing, IotOption::Unrecognized);
    }

    #[test]
    fn should_fail_decode_when_json_is_malformed() {
        let err = IotOption::decode("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn should_fail_decode_when_two_variants_are_set() {
        let raw = r#"{"device_selection":{"device_id":"d"},"device_group_selection":{"id":"g"}}"#;
        let err = IotOption::decode(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn should_serialize_unset_variants_as_null() {
        let json = serde_json::to_value(group("g1")).unwrap();
        assert_eq!(json["device_group_selection"]["id"], "g1");
        assert!(json["device_selection"].is_null());
    }

    #[test]
    fn should_group_by_service_with_empty_key_for_others() {
        let options = vec![IotOption::device("d1", Some(ServiceId::from("s1"))), group("g1")];
        let groups = group_by_service(&options);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["s1"], vec![options[0].clone()]);
        assert_eq!(groups[""], vec![options[1].clone()]);
    }

    #[test]
    fn should_partition_input_when_grouping_by_device() {
        let options = vec![
            IotOption::device("d1", None),
            IotOption::device("d2", None),
            group("g1"),
            IotOption::device("d1", Some(ServiceId::from("s1"))),
        ];
        let groups = group_by_device(&options);
        assert_eq!(groups["d1"], vec![options[0].clone(), options[3].clone()]);
        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, options.len());
        assert_eq!(groups[""], vec![options[2].clone()]);
    }

    #[test]
    fn should_expand_device_per_service_and_path() {
        let device = Device {
            id: DeviceId::from("d1"),
            device_type_id: DeviceTypeId::from("dt"),
            ..Device::default()
        };
        let service = |id: &str| Service {
            id: ServiceId::from(id),
            ..Service::default()
        };
        let mut selectable = DeviceTypeSelectable {
            device_type_id: DeviceTypeId::from("dt"),
            services: vec![service("s1"), service("s2")],
            ..DeviceTypeSelectable::default()
        };
        selectable.service_path_options.insert(
            ServiceId::from("s2"),
            vec![ServicePathOption {
                path: "value.level".to_string(),
                characteristic_id: CharacteristicId::from("percent"),
                ..ServicePathOption::default()
            }],
        );
        let other = DeviceTypeSelectable {
            device_type_id: DeviceTypeId::from("other"),
            services: vec![service("s9")],
            ..DeviceTypeSelectable::default()
        };

        let expanded = expand_device(&device, &[selectable, other]);
        assert_eq!(
            expanded,
            vec![
                IotOption::device("d1", Some(ServiceId::from("s1"))),
                IotOption::Device(DeviceSelection {
                    device_id: DeviceId::from("d1"),
                    service_id: Some(ServiceId::from("s2")),
                    path: Some("value.level".to_string()),
                    characteristic_id: Some(CharacteristicId::from("percent")),
                }),
            ]
        );
    }
}
