//! Concepts and characteristics.

use serde::{Deserialize, Serialize};

use crate::id::{CharacteristicId, ConceptId};

/// A unit/encoding of a value, possibly structured into sub-characteristics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Characteristic {
    pub id: CharacteristicId,
    pub name: String,
    pub display_unit: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub min_value: Option<serde_json::Value>,
    pub max_value: Option<serde_json::Value>,
    pub allowed_values: Vec<serde_json::Value>,
    pub value: Option<serde_json::Value>,
    pub sub_characteristics: Vec<Characteristic>,
}

impl Characteristic {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.sub_characteristics.is_empty()
    }
}

/// Conversion rule between two characteristics of a concept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterExtension {
    pub from: CharacteristicId,
    pub to: CharacteristicId,
    pub distance: i64,
    pub formula: String,
    pub placeholder_name: String,
}

/// A physical quantity grouping interchangeable characteristics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Concept {
    pub id: ConceptId,
    pub name: String,
    pub characteristic_ids: Vec<CharacteristicId>,
    pub base_characteristic_id: CharacteristicId,
    pub conversions: Vec<ConverterExtension>,
}

/// A [`Concept`] with its characteristic ids resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptWithCharacteristics {
    pub id: ConceptId,
    pub name: String,
    pub base_characteristic_id: CharacteristicId,
    pub characteristics: Vec<Characteristic>,
    pub conversions: Vec<ConverterExtension>,
}
