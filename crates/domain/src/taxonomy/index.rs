//! Read-only lookup tables over a taxonomy snapshot.
//!
//! Aspect nodes are stored in forest pre-order, so the descendants of a node
//! are always the contiguous run that follows it.

use std::collections::{HashMap, HashSet};

use crate::device_type::{ContentVariable, DeviceType, Service};
use crate::error::{MalformedInputError, NotFoundError, ScriptEnvError};
use crate::id::{AspectId, CharacteristicId, ConceptId, DeviceClassId, DeviceTypeId, FunctionId, ServiceId};

use super::{
    Aspect, AspectFunctionLink, AspectNode, Characteristic, Concept, ConceptWithCharacteristics,
    DeviceClass, DeviceClassFunctionLink, FunctionType, TaxonomySnapshot,
};

/// Precomputed taxonomy lookups, shared read-only between tasks.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyIndex {
    root_positions: Vec<usize>,
    aspect_nodes: Vec<AspectNode>,
    aspect_positions: HashMap<AspectId, usize>,
    functions: Vec<FunctionType>,
    function_positions: HashMap<FunctionId, usize>,
    device_classes: Vec<DeviceClass>,
    device_class_positions: HashMap<DeviceClassId, usize>,
    concepts: Vec<Concept>,
    concept_positions: HashMap<ConceptId, usize>,
    characteristics: HashMap<CharacteristicId, Characteristic>,
    leaf_characteristic_ids: Vec<CharacteristicId>,
    device_types: Vec<DeviceType>,
    device_type_positions: HashMap<DeviceTypeId, usize>,
    service_positions: HashMap<ServiceId, (usize, usize)>,
    aspect_functions: HashMap<AspectId, Vec<FunctionId>>,
    device_class_functions: HashMap<DeviceClassId, Vec<FunctionId>>,
}

/// Builder for [`TaxonomyIndex`].
#[derive(Debug, Default)]
pub struct TaxonomyIndexBuilder {
    aspects: Vec<Aspect>,
    functions: Vec<FunctionType>,
    device_classes: Vec<DeviceClass>,
    concepts: Vec<Concept>,
    characteristics: Vec<Characteristic>,
    device_types: Vec<DeviceType>,
    aspect_functions: Vec<AspectFunctionLink>,
    device_class_functions: Vec<DeviceClassFunctionLink>,
}

impl TaxonomyIndexBuilder {
    /// Root aspects, each with its nested sub-aspects.
    #[must_use]
    pub fn aspects(mut self, aspects: impl IntoIterator<Item = Aspect>) -> Self {
        self.aspects.extend(aspects);
        self
    }

    #[must_use]
    pub fn functions(mut self, functions: impl IntoIterator<Item = FunctionType>) -> Self {
        self.functions.extend(functions);
        self
    }

    #[must_use]
    pub fn device_classes(mut self, classes: impl IntoIterator<Item = DeviceClass>) -> Self {
        self.device_classes.extend(classes);
        self
    }

    #[must_use]
    pub fn concepts(mut self, concepts: impl IntoIterator<Item = Concept>) -> Self {
        self.concepts.extend(concepts);
        self
    }

    /// Root characteristics, each with its nested sub-characteristics.
    #[must_use]
    pub fn characteristics(
        mut self,
        characteristics: impl IntoIterator<Item = Characteristic>,
    ) -> Self {
        self.characteristics.extend(characteristics);
        self
    }

    /// Device types in source order. Function associations are derived from
    /// their content variables when the index is built.
    #[must_use]
    pub fn device_types(mut self, device_types: impl IntoIterator<Item = DeviceType>) -> Self {
        self.device_types.extend(device_types);
        self
    }

    #[must_use]
    pub fn link_aspect_function(
        mut self,
        aspect_id: impl Into<AspectId>,
        function_id: impl Into<FunctionId>,
    ) -> Self {
        self.aspect_functions.push(AspectFunctionLink {
            aspect_id: aspect_id.into(),
            function_id: function_id.into(),
        });
        self
    }

    #[must_use]
    pub fn link_device_class_function(
        mut self,
        device_class_id: impl Into<DeviceClassId>,
        function_id: impl Into<FunctionId>,
    ) -> Self {
        self.device_class_functions.push(DeviceClassFunctionLink {
            device_class_id: device_class_id.into(),
            function_id: function_id.into(),
        });
        self
    }

    /// Compute the aspect closures and association tables.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::MalformedInput`] when an aspect, function,
    /// device class, concept or device type id appears twice.
    pub fn build(self) -> Result<TaxonomyIndex, ScriptEnvError> {
        let (aspect_nodes, root_positions, aspect_positions) = build_aspect_forest(&self.aspects)?;
        let function_positions = positions(&self.functions, "Function", |f| &f.id)?;
        let device_class_positions = positions(&self.device_classes, "DeviceClass", |c| &c.id)?;
        let concept_positions = positions(&self.concepts, "Concept", |c| &c.id)?;
        let device_type_positions = positions(&self.device_types, "DeviceType", |d| &d.id)?;
        let (characteristics, leaf_characteristic_ids) = flatten_characteristics(&self.characteristics);

        let mut service_positions = HashMap::new();
        for (type_pos, device_type) in self.device_types.iter().enumerate() {
            for (service_pos, service) in device_type.services.iter().enumerate() {
                service_positions
                    .entry(service.id.clone())
                    .or_insert((type_pos, service_pos));
            }
        }

        let mut aspect_functions = Links::default();
        let mut device_class_functions = Links::default();
        for device_type in &self.device_types {
            for service in &device_type.services {
                for_each_variable(service, |variable, is_output| {
                    if variable.function_id.is_empty()
                        || !function_positions.contains_key(&variable.function_id)
                    {
                        return;
                    }
                    if is_output && !variable.aspect_id.is_empty() {
                        aspect_functions.add(&variable.aspect_id, &variable.function_id);
                    }
                    if !device_type.device_class_id.is_empty() {
                        device_class_functions
                            .add(&device_type.device_class_id, &variable.function_id);
                    }
                });
            }
        }
        for link in &self.aspect_functions {
            if function_positions.contains_key(&link.function_id) {
                aspect_functions.add(&link.aspect_id, &link.function_id);
            }
        }
        for link in &self.device_class_functions {
            if function_positions.contains_key(&link.function_id) {
                device_class_functions.add(&link.device_class_id, &link.function_id);
            }
        }

        Ok(TaxonomyIndex {
            root_positions,
            aspect_nodes,
            aspect_positions,
            functions: self.functions,
            function_positions,
            device_classes: self.device_classes,
            device_class_positions,
            concepts: self.concepts,
            concept_positions,
            characteristics,
            leaf_characteristic_ids,
            device_types: self.device_types,
            device_type_positions,
            service_positions,
            aspect_functions: aspect_functions.by_key,
            device_class_functions: device_class_functions.by_key,
        })
    }
}

/// Ordered, de-duplicated key → function associations.
#[derive(Default)]
struct Links<K> {
    by_key: HashMap<K, Vec<FunctionId>>,
}

impl<K: Clone + Eq + std::hash::Hash> Links<K> {
    fn add(&mut self, key: &K, function_id: &FunctionId) {
        let functions = self.by_key.entry(key.clone()).or_default();
        if !functions.contains(function_id) {
            functions.push(function_id.clone());
        }
    }
}

fn positions<T, K: Clone + Eq + std::hash::Hash + std::fmt::Display>(
    items: &[T],
    entity: &'static str,
    key: impl Fn(&T) -> &K,
) -> Result<HashMap<K, usize>, MalformedInputError> {
    let mut result = HashMap::with_capacity(items.len());
    for (pos, item) in items.iter().enumerate() {
        if result.insert(key(item).clone(), pos).is_some() {
            return Err(MalformedInputError::DuplicateId {
                entity,
                id: key(item).to_string(),
            });
        }
    }
    Ok(result)
}

type AspectForest = (Vec<AspectNode>, Vec<usize>, HashMap<AspectId, usize>);

fn build_aspect_forest(roots: &[Aspect]) -> Result<AspectForest, MalformedInputError> {
    let mut nodes: Vec<AspectNode> = Vec::new();
    let mut root_positions = Vec::with_capacity(roots.len());
    let mut by_id = HashMap::new();

    let mut stack: Vec<(&Aspect, Option<usize>)> = roots.iter().rev().map(|a| (a, None)).collect();
    while let Some((aspect, parent)) = stack.pop() {
        let pos = nodes.len();
        if by_id.insert(aspect.id.clone(), pos).is_some() {
            return Err(MalformedInputError::DuplicateId {
                entity: "Aspect",
                id: aspect.id.to_string(),
            });
        }
        let node = match parent {
            Some(parent_pos) => {
                let parent_node = &mut nodes[parent_pos];
                parent_node.child_ids.push(aspect.id.clone());
                let mut ancestor_ids = Vec::with_capacity(parent_node.ancestor_ids.len() + 1);
                ancestor_ids.push(parent_node.id.clone());
                ancestor_ids.extend(parent_node.ancestor_ids.iter().cloned());
                AspectNode {
                    id: aspect.id.clone(),
                    name: aspect.name.clone(),
                    root_id: parent_node.root_id.clone(),
                    parent_id: parent_node.id.clone(),
                    child_ids: Vec::new(),
                    ancestor_ids,
                    descendent_ids: Vec::new(),
                }
            }
            None => {
                root_positions.push(pos);
                AspectNode {
                    id: aspect.id.clone(),
                    name: aspect.name.clone(),
                    root_id: aspect.id.clone(),
                    ..AspectNode::default()
                }
            }
        };
        nodes.push(node);
        stack.extend(aspect.sub_aspects.iter().rev().map(|child| (child, Some(pos))));
    }

    // subtree sizes, children always sit after their parent
    let mut sizes = vec![1usize; nodes.len()];
    for pos in (0..nodes.len()).rev() {
        let children: usize = nodes[pos]
            .child_ids
            .iter()
            .filter_map(|id| by_id.get(id))
            .map(|child| sizes[*child])
            .sum();
        sizes[pos] += children;
    }
    let descendants: Vec<Vec<AspectId>> = sizes
        .iter()
        .enumerate()
        .map(|(pos, size)| nodes[pos + 1..pos + size].iter().map(|n| n.id.clone()).collect())
        .collect();
    for (node, descendent_ids) in nodes.iter_mut().zip(descendants) {
        node.descendent_ids = descendent_ids;
    }

    Ok((nodes, root_positions, by_id))
}

fn flatten_characteristics(
    roots: &[Characteristic],
) -> (HashMap<CharacteristicId, Characteristic>, Vec<CharacteristicId>) {
    let mut lookup = HashMap::new();
    let mut leaves = Vec::new();
    let mut stack: Vec<&Characteristic> = roots.iter().rev().collect();
    while let Some(characteristic) = stack.pop() {
        if characteristic.is_leaf() {
            leaves.push(characteristic.id.clone());
        }
        lookup
            .entry(characteristic.id.clone())
            .or_insert_with(|| characteristic.clone());
        stack.extend(characteristic.sub_characteristics.iter().rev());
    }
    (lookup, leaves)
}

/// Visit every content variable of a service; the flag is `true` for outputs.
fn for_each_variable(service: &Service, mut visit: impl FnMut(&ContentVariable, bool)) {
    let roots = service
        .inputs
        .iter()
        .map(|c| (&c.content_variable, false))
        .chain(service.outputs.iter().map(|c| (&c.content_variable, true)));
    for (root, is_output) in roots {
        let mut stack = vec![root];
        while let Some(variable) = stack.pop() {
            visit(variable, is_output);
            stack.extend(variable.sub_content_variables.iter().rev());
        }
    }
}

impl TaxonomyIndex {
    #[must_use]
    pub fn builder() -> TaxonomyIndexBuilder {
        TaxonomyIndexBuilder::default()
    }

    /// Build an index from everything the repository returned.
    ///
    /// # Errors
    ///
    /// See [`TaxonomyIndexBuilder::build`].
    pub fn from_snapshot(snapshot: TaxonomySnapshot) -> Result<Self, ScriptEnvError> {
        let mut builder = Self::builder()
            .aspects(snapshot.aspects)
            .functions(snapshot.functions)
            .device_classes(snapshot.device_classes)
            .concepts(snapshot.concepts)
            .characteristics(snapshot.characteristics)
            .device_types(snapshot.device_types);
        builder.aspect_functions = snapshot.aspect_functions;
        builder.device_class_functions = snapshot.device_class_functions;
        builder.build()
    }

    // ---- aspects ----

    /// All aspect nodes in forest pre-order.
    #[must_use]
    pub fn aspect_nodes(&self) -> &[AspectNode] {
        &self.aspect_nodes
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    pub fn aspect_node(&self, id: &AspectId) -> Result<&AspectNode, ScriptEnvError> {
        self.find_aspect_node(id)
            .ok_or_else(|| NotFoundError::new("AspectNode", id).into())
    }

    /// Lookup that does not fail; used where a missing node is not an error.
    #[must_use]
    pub fn find_aspect_node(&self, id: &AspectId) -> Option<&AspectNode> {
        self.aspect_positions.get(id).map(|pos| &self.aspect_nodes[*pos])
    }

    /// Nodes for `ids`, in the order requested.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for the first unknown id.
    pub fn aspect_nodes_by_ids(&self, ids: &[AspectId]) -> Result<Vec<AspectNode>, ScriptEnvError> {
        ids.iter()
            .map(|id| self.aspect_node(id).cloned())
            .collect()
    }

    /// Root aspects with their full sub-aspect trees.
    #[must_use]
    pub fn aspects(&self) -> Vec<Aspect> {
        self.root_positions
            .iter()
            .map(|pos| self.aspect_tree(*pos, &|_| true))
            .collect()
    }

    /// The aspect `id` with its sub-aspect tree; `id` need not be a root.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    pub fn aspect(&self, id: &AspectId) -> Result<Aspect, ScriptEnvError> {
        let pos = self
            .aspect_positions
            .get(id)
            .ok_or_else(|| NotFoundError::new("Aspect", id))?;
        Ok(self.aspect_tree(*pos, &|_| true))
    }

    fn aspect_tree(&self, pos: usize, keep: &dyn Fn(usize) -> bool) -> Aspect {
        let node = &self.aspect_nodes[pos];
        Aspect {
            id: node.id.clone(),
            name: node.name.clone(),
            sub_aspects: node
                .child_ids
                .iter()
                .filter_map(|id| self.aspect_positions.get(id).copied())
                .filter(|child| keep(*child))
                .map(|child| self.aspect_tree(child, keep))
                .collect(),
        }
    }

    /// Whether a variable tagged with `candidate` satisfies a criterion on
    /// `criterion`: the same aspect or one of its descendants. An aspect the
    /// index does not know only matches itself.
    #[must_use]
    pub fn aspect_matches(&self, criterion: &AspectId, candidate: &AspectId) -> bool {
        if criterion == candidate {
            return true;
        }
        self.find_aspect_node(candidate)
            .is_some_and(|node| node.ancestor_ids.contains(criterion))
    }

    // ---- measuring functions ----

    /// Union of the measuring functions attached to `id`, plus those of its
    /// ancestors and/or descendants when requested. Own functions come first,
    /// then ancestors nearest-first, then descendants in pre-order.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown aspect id.
    pub fn aspect_node_measuring_functions(
        &self,
        id: &AspectId,
        ancestors: bool,
        descendants: bool,
    ) -> Result<Vec<FunctionType>, ScriptEnvError> {
        let node = self.aspect_node(id)?;
        Ok(self.measuring_functions_of(node, ancestors, descendants))
    }

    fn measuring_functions_of(
        &self,
        node: &AspectNode,
        ancestors: bool,
        descendants: bool,
    ) -> Vec<FunctionType> {
        let related = std::iter::once(&node.id)
            .chain(node.ancestor_ids.iter().filter(|_| ancestors))
            .chain(node.descendent_ids.iter().filter(|_| descendants));
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for aspect_id in related {
            let Some(function_ids) = self.aspect_functions.get(aspect_id) else {
                continue;
            };
            for function_id in function_ids {
                if !seen.insert(function_id) {
                    continue;
                }
                if let Some(function) = self.find_function(function_id)
                    && function.is_measuring()
                {
                    result.push(function.clone());
                }
            }
        }
        result
    }

    /// Aspect nodes that have at least one measuring function under the
    /// given expansion, in pre-order.
    #[must_use]
    pub fn aspect_nodes_with_measuring_function(
        &self,
        ancestors: bool,
        descendants: bool,
    ) -> Vec<AspectNode> {
        self.aspect_nodes
            .iter()
            .filter(|node| !self.measuring_functions_of(node, ancestors, descendants).is_empty())
            .cloned()
            .collect()
    }

    /// Root aspects whose tree holds a qualifying node, pruned so that every
    /// kept aspect either qualifies itself or leads to one that does.
    #[must_use]
    pub fn aspects_with_measuring_function(&self, ancestors: bool, descendants: bool) -> Vec<Aspect> {
        let qualifies: Vec<bool> = self
            .aspect_nodes
            .iter()
            .map(|node| !self.measuring_functions_of(node, ancestors, descendants).is_empty())
            .collect();
        let mut keep = qualifies.clone();
        for pos in (0..self.aspect_nodes.len()).rev() {
            if keep[pos] {
                continue;
            }
            let child_kept = self.aspect_nodes[pos]
                .child_ids
                .iter()
                .filter_map(|id| self.aspect_positions.get(id))
                .any(|child| keep[*child]);
            keep[pos] = child_kept;
        }
        self.root_positions
            .iter()
            .filter(|pos| keep[**pos])
            .map(|pos| self.aspect_tree(*pos, &|child| keep[child]))
            .collect()
    }

    // ---- functions ----

    #[must_use]
    pub fn functions(&self) -> &[FunctionType] {
        &self.functions
    }

    #[must_use]
    pub fn find_function(&self, id: &FunctionId) -> Option<&FunctionType> {
        self.function_positions.get(id).map(|pos| &self.functions[*pos])
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    pub fn function(&self, id: &FunctionId) -> Result<&FunctionType, ScriptEnvError> {
        self.find_function(id)
            .ok_or_else(|| NotFoundError::new("Function", id).into())
    }

    /// Functions whose `rdf_type` equals `rdf_type`, in source order.
    #[must_use]
    pub fn functions_by_type(&self, rdf_type: &str) -> Vec<FunctionType> {
        self.functions
            .iter()
            .filter(|f| f.rdf_type == rdf_type)
            .cloned()
            .collect()
    }

    // ---- device classes ----

    #[must_use]
    pub fn device_classes(&self) -> &[DeviceClass] {
        &self.device_classes
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    pub fn device_class(&self, id: &DeviceClassId) -> Result<&DeviceClass, ScriptEnvError> {
        self.device_class_positions
            .get(id)
            .map(|pos| &self.device_classes[*pos])
            .ok_or_else(|| NotFoundError::new("DeviceClass", id).into())
    }

    /// Every function associated with the device class.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown device class.
    pub fn device_class_functions(
        &self,
        id: &DeviceClassId,
    ) -> Result<Vec<FunctionType>, ScriptEnvError> {
        self.device_class(id)?;
        Ok(self.device_class_functions_where(id, |_| true))
    }

    /// Controlling functions associated with the device class.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown device class.
    pub fn device_class_controlling_functions(
        &self,
        id: &DeviceClassId,
    ) -> Result<Vec<FunctionType>, ScriptEnvError> {
        self.device_class(id)?;
        Ok(self.device_class_functions_where(id, FunctionType::is_controlling))
    }

    fn device_class_functions_where(
        &self,
        id: &DeviceClassId,
        filter: impl Fn(&FunctionType) -> bool,
    ) -> Vec<FunctionType> {
        self.device_class_functions
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|function_id| self.find_function(function_id))
            .filter(|f| filter(f))
            .cloned()
            .collect()
    }

    /// Device classes with at least one controlling function, in source order.
    #[must_use]
    pub fn device_classes_with_controlling_functions(&self) -> Vec<DeviceClass> {
        self.device_classes
            .iter()
            .filter(|class| {
                !self
                    .device_class_functions_where(&class.id, FunctionType::is_controlling)
                    .is_empty()
            })
            .cloned()
            .collect()
    }

    // ---- concepts & characteristics ----

    /// Any characteristic, including nested sub-characteristics.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    pub fn characteristic(&self, id: &CharacteristicId) -> Result<&Characteristic, ScriptEnvError> {
        self.characteristics
            .get(id)
            .ok_or_else(|| NotFoundError::new("Characteristic", id).into())
    }

    /// Characteristics without sub-characteristics, in pre-order.
    #[must_use]
    pub fn leaf_characteristics(&self) -> Vec<Characteristic> {
        self.leaf_characteristic_ids
            .iter()
            .filter_map(|id| self.characteristics.get(id))
            .cloned()
            .collect()
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    pub fn concept(&self, id: &ConceptId) -> Result<&Concept, ScriptEnvError> {
        self.concept_positions
            .get(id)
            .map(|pos| &self.concepts[*pos])
            .ok_or_else(|| NotFoundError::new("Concept", id).into())
    }

    /// The concept with its characteristic ids resolved. Ids the index does
    /// not know are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown concept.
    pub fn concept_with_characteristics(
        &self,
        id: &ConceptId,
    ) -> Result<ConceptWithCharacteristics, ScriptEnvError> {
        let concept = self.concept(id)?;
        Ok(ConceptWithCharacteristics {
            id: concept.id.clone(),
            name: concept.name.clone(),
            base_characteristic_id: concept.base_characteristic_id.clone(),
            characteristics: concept
                .characteristic_ids
                .iter()
                .filter_map(|id| self.characteristics.get(id))
                .cloned()
                .collect(),
            conversions: concept.conversions.clone(),
        })
    }

    // ---- device types ----

    /// Device types in source order.
    #[must_use]
    pub fn device_types(&self) -> &[DeviceType] {
        &self.device_types
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    pub fn device_type(&self, id: &DeviceTypeId) -> Result<&DeviceType, ScriptEnvError> {
        self.device_type_positions
            .get(id)
            .map(|pos| &self.device_types[*pos])
            .ok_or_else(|| NotFoundError::new("DeviceType", id).into())
    }

    /// A service of any device type. The first device type carrying the id wins.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] for an unknown id.
    pub fn service(&self, id: &ServiceId) -> Result<&Service, ScriptEnvError> {
        self.service_positions
            .get(id)
            .map(|(type_pos, service_pos)| &self.device_types[*type_pos].services[*service_pos])
            .ok_or_else(|| NotFoundError::new("Service", id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_type::Content;
    use crate::error::ErrorKind;
    use crate::taxonomy::{CONTROLLING_FUNCTION_TYPE, MEASURING_FUNCTION_TYPE};
    use crate::testing::{aspect, function};

    fn ids(values: &[AspectId]) -> Vec<&str> {
        values.iter().map(AspectId::as_str).collect()
    }

    fn forest() -> Vec<Aspect> {
        vec![
            aspect(
                "air",
                vec![
                    aspect("inside_air", vec![aspect("room_air", vec![])]),
                    aspect("outside_air", vec![]),
                ],
            ),
            aspect("water", vec![]),
        ]
    }

    fn index() -> TaxonomyIndex {
        TaxonomyIndex::builder()
            .aspects(forest())
            .functions([
                function("getTemperature", MEASURING_FUNCTION_TYPE),
                function("getHumidity", MEASURING_FUNCTION_TYPE),
                function("setOn", CONTROLLING_FUNCTION_TYPE),
            ])
            .device_classes([
                DeviceClass {
                    id: DeviceClassId::from("lamp"),
                    name: "Lamp".to_string(),
                    ..DeviceClass::default()
                },
                DeviceClass {
                    id: DeviceClassId::from("sensor"),
                    name: "Sensor".to_string(),
                    ..DeviceClass::default()
                },
            ])
            .link_aspect_function("air", "getTemperature")
            .link_aspect_function("room_air", "getHumidity")
            .link_aspect_function("room_air", "setOn")
            .link_device_class_function("lamp", "setOn")
            .link_device_class_function("lamp", "getTemperature")
            .build()
            .unwrap()
    }

    #[test]
    fn should_compute_closures_when_building_forest() {
        let index = index();
        let room = index.aspect_node(&AspectId::from("room_air")).unwrap();
        assert_eq!(room.root_id.as_str(), "air");
        assert_eq!(room.parent_id.as_str(), "inside_air");
        assert_eq!(ids(&room.ancestor_ids), ["inside_air", "air"]);
        assert!(room.descendent_ids.is_empty());

        let air = index.aspect_node(&AspectId::from("air")).unwrap();
        assert!(air.is_root());
        assert_eq!(ids(&air.child_ids), ["inside_air", "outside_air"]);
        assert_eq!(ids(&air.descendent_ids), ["inside_air", "room_air", "outside_air"]);
    }

    #[test]
    fn should_keep_ancestors_and_descendants_disjoint() {
        let index = index();
        for node in index.aspect_nodes() {
            assert!(!node.ancestor_ids.contains(&node.id));
            assert!(!node.descendent_ids.contains(&node.id));
            for ancestor in &node.ancestor_ids {
                assert!(!node.descendent_ids.contains(ancestor));
            }
        }
    }

    #[test]
    fn should_mark_exactly_one_root_per_tree() {
        let index = index();
        let roots: Vec<&str> = index
            .aspect_nodes()
            .iter()
            .filter(|n| n.is_root())
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(roots, ["air", "water"]);
        for node in index.aspect_nodes().iter().filter(|n| n.is_root()) {
            assert_eq!(node.root_id, node.id);
        }
    }

    #[test]
    fn should_fail_when_aspect_id_is_duplicated() {
        let result = TaxonomyIndex::builder()
            .aspects([aspect("air", vec![aspect("air", vec![])])])
            .build();
        assert_eq!(result.unwrap_err().kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn should_return_not_found_when_aspect_node_is_unknown() {
        let err = index().aspect_node(&AspectId::from("fire")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.subject(), Some("fire"));
    }

    #[test]
    fn should_return_nodes_in_requested_order() {
        let nodes = index()
            .aspect_nodes_by_ids(&[AspectId::from("water"), AspectId::from("air")])
            .unwrap();
        let names: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(names, ["water", "air"]);
    }

    #[test]
    fn should_rebuild_subtree_when_getting_aspect() {
        let inside = index().aspect(&AspectId::from("inside_air")).unwrap();
        assert_eq!(inside, aspect("inside_air", vec![aspect("room_air", vec![])]));
        assert_eq!(index().aspects(), forest());
    }

    #[test]
    fn should_union_measuring_functions_over_requested_directions() {
        let index = index();
        let names = |anc, desc| -> Vec<String> {
            index
                .aspect_node_measuring_functions(&AspectId::from("inside_air"), anc, desc)
                .unwrap()
                .into_iter()
                .map(|f| f.id.to_string())
                .collect()
        };
        assert!(names(false, false).is_empty());
        assert_eq!(names(true, false), ["getTemperature"]);
        assert_eq!(names(false, true), ["getHumidity"]);
        assert_eq!(names(true, true), ["getTemperature", "getHumidity"]);
    }

    #[test]
    fn should_include_own_functions_in_every_expansion() {
        let index = index();
        for node in index.aspect_nodes() {
            let own = index
                .aspect_node_measuring_functions(&node.id, false, false)
                .unwrap();
            let all = index
                .aspect_node_measuring_functions(&node.id, true, true)
                .unwrap();
            for function in own {
                assert!(all.contains(&function));
            }
        }
    }

    #[test]
    fn should_prune_aspects_to_qualifying_subtrees() {
        let index = index();
        let own_only = index.aspects_with_measuring_function(false, false);
        assert_eq!(
            own_only,
            vec![aspect(
                "air",
                vec![aspect("inside_air", vec![aspect("room_air", vec![])])]
            )]
        );
        let nodes: Vec<String> = index
            .aspect_nodes_with_measuring_function(false, false)
            .into_iter()
            .map(|n| n.id.to_string())
            .collect();
        assert_eq!(nodes, ["air", "room_air"]);
    }

    #[test]
    fn should_filter_device_class_functions_by_rdf_type() {
        let index = index();
        let lamp = DeviceClassId::from("lamp");
        assert_eq!(index.device_class_functions(&lamp).unwrap().len(), 2);
        let controlling = index.device_class_controlling_functions(&lamp).unwrap();
        assert_eq!(controlling.len(), 1);
        assert_eq!(controlling[0].id.as_str(), "setOn");
        let classes = index.device_classes_with_controlling_functions();
        let with: Vec<&str> = classes
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(with, ["lamp"]);
    }

    #[test]
    fn should_derive_associations_from_device_type_content() {
        let output = ContentVariable {
            name: "temperature".to_string(),
            function_id: FunctionId::from("getTemperature"),
            aspect_id: AspectId::from("water"),
            ..ContentVariable::default()
        };
        let index = TaxonomyIndex::builder()
            .aspects(forest())
            .functions([function("getTemperature", MEASURING_FUNCTION_TYPE)])
            .device_classes([DeviceClass {
                id: DeviceClassId::from("sensor"),
                ..DeviceClass::default()
            }])
            .device_types([DeviceType {
                id: DeviceTypeId::from("dt"),
                device_class_id: DeviceClassId::from("sensor"),
                services: vec![Service {
                    id: ServiceId::from("s"),
                    outputs: vec![Content {
                        content_variable: output,
                        ..Content::default()
                    }],
                    ..Service::default()
                }],
                ..DeviceType::default()
            }])
            .build()
            .unwrap();
        let water = index
            .aspect_node_measuring_functions(&AspectId::from("water"), false, false)
            .unwrap();
        assert_eq!(water.len(), 1);
        let sensor = index
            .device_class_functions(&DeviceClassId::from("sensor"))
            .unwrap();
        assert_eq!(sensor.len(), 1);
        assert_eq!(index.service(&ServiceId::from("s")).unwrap().id.as_str(), "s");
    }

    #[test]
    fn should_find_nested_and_leaf_characteristics() {
        let leaf = |id: &str| Characteristic {
            id: CharacteristicId::from(id),
            ..Characteristic::default()
        };
        let index = TaxonomyIndex::builder()
            .characteristics([Characteristic {
                id: CharacteristicId::from("rgb"),
                sub_characteristics: vec![leaf("r"), leaf("g"), leaf("b")],
                ..Characteristic::default()
            }])
            .concepts([Concept {
                id: ConceptId::from("color"),
                characteristic_ids: vec![CharacteristicId::from("rgb"), CharacteristicId::from("hsb")],
                ..Concept::default()
            }])
            .build()
            .unwrap();
        assert!(index.characteristic(&CharacteristicId::from("g")).is_ok());
        let leaves: Vec<String> = index
            .leaf_characteristics()
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(leaves, ["r", "g", "b"]);
        let concept = index
            .concept_with_characteristics(&ConceptId::from("color"))
            .unwrap();
        assert_eq!(concept.characteristics.len(), 1);
    }

    #[test]
    fn should_match_aspect_on_self_or_descendant() {
        let index = index();
        let air = AspectId::from("air");
        assert!(index.aspect_matches(&air, &AspectId::from("room_air")));
        assert!(index.aspect_matches(&air, &air));
        assert!(!index.aspect_matches(&AspectId::from("room_air"), &air));
        assert!(!index.aspect_matches(&AspectId::from("water"), &AspectId::from("unknown")));
    }
}
