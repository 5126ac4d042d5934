//! Taxonomy — the aspect forest, functions, device classes, concepts and
//! characteristics that describe what device-type services do.
//!
//! The records mirror the device repository's wire format. The
//! [`TaxonomyIndex`] is built once from a [`TaxonomySnapshot`] and is
//! read-only afterwards.

mod aspect;
mod characteristic;
mod function;
mod index;

pub use aspect::{Aspect, AspectNode};
pub use characteristic::{Characteristic, Concept, ConceptWithCharacteristics, ConverterExtension};
pub use function::{CONTROLLING_FUNCTION_TYPE, DeviceClass, FunctionType, MEASURING_FUNCTION_TYPE};
pub use index::{TaxonomyIndex, TaxonomyIndexBuilder};

use serde::{Deserialize, Serialize};

use crate::device_type::DeviceType;
use crate::id::{AspectId, DeviceClassId, FunctionId};

/// Explicit aspect → measuring-function association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectFunctionLink {
    pub aspect_id: AspectId,
    pub function_id: FunctionId,
}

/// Explicit device-class → function association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceClassFunctionLink {
    pub device_class_id: DeviceClassId,
    pub function_id: FunctionId,
}

/// Everything the device repository knows about the taxonomy, as one
/// serializable record. Input to [`TaxonomyIndex::from_snapshot`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomySnapshot {
    /// Root aspects with their nested sub-aspects.
    pub aspects: Vec<Aspect>,
    pub functions: Vec<FunctionType>,
    pub device_classes: Vec<DeviceClass>,
    pub concepts: Vec<Concept>,
    /// Root characteristics with their nested sub-characteristics.
    pub characteristics: Vec<Characteristic>,
    /// Device types in repository order; associations are derived from them.
    pub device_types: Vec<DeviceType>,
    pub aspect_functions: Vec<AspectFunctionLink>,
    pub device_class_functions: Vec<DeviceClassFunctionLink>,
}
