//! Builders shared by the unit tests of this crate.

use crate::device_type::{Content, ContentVariable, DeviceType, Interaction, Service};
use crate::id::{AspectId, CharacteristicId, DeviceClassId, DeviceTypeId, FunctionId, ServiceId};
use crate::taxonomy::{Aspect, FunctionType};

pub fn aspect(id: &str, children: Vec<Aspect>) -> Aspect {
    Aspect {
        id: AspectId::from(id),
        name: id.to_string(),
        sub_aspects: children,
    }
}

pub fn function(id: &str, rdf_type: &str) -> FunctionType {
    FunctionType {
        id: FunctionId::from(id),
        name: id.to_string(),
        rdf_type: rdf_type.to_string(),
        ..FunctionType::default()
    }
}

/// An untagged structural node.
pub fn node(name: &str, children: Vec<ContentVariable>) -> ContentVariable {
    ContentVariable {
        id: name.to_string(),
        name: name.to_string(),
        sub_content_variables: children,
        ..ContentVariable::default()
    }
}

/// A leaf carrying a characteristic, optionally tagged with function and aspect.
pub fn leaf(name: &str, characteristic: &str, function: &str, aspect: &str) -> ContentVariable {
    ContentVariable {
        id: name.to_string(),
        name: name.to_string(),
        value_type: "https://schema.org/Float".to_string(),
        characteristic_id: CharacteristicId::from(characteristic),
        function_id: FunctionId::from(function),
        aspect_id: AspectId::from(aspect),
        ..ContentVariable::default()
    }
}

pub fn service(
    id: &str,
    interaction: Interaction,
    inputs: Vec<ContentVariable>,
    outputs: Vec<ContentVariable>,
) -> Service {
    let wrap = |variables: Vec<ContentVariable>| -> Vec<Content> {
        variables
            .into_iter()
            .map(|content_variable| Content {
                id: format!("{id}-{}", content_variable.name),
                content_variable,
                serialization: "json".to_string(),
                ..Content::default()
            })
            .collect()
    };
    Service {
        id: ServiceId::from(id),
        local_id: id.to_string(),
        name: id.to_string(),
        interaction,
        inputs: wrap(inputs),
        outputs: wrap(outputs),
        ..Service::default()
    }
}

pub fn device_type(id: &str, device_class: &str, services: Vec<Service>) -> DeviceType {
    DeviceType {
        id: DeviceTypeId::from(id),
        name: id.to_string(),
        device_class_id: DeviceClassId::from(device_class),
        services,
        ..DeviceType::default()
    }
}
