//! Selectable builder: which services and content-variable paths of each
//! device type satisfy a criteria query.
//!
//! Every content-variable tree is flattened in pre-order once, so pruning a
//! subtree is a jump to the index just past it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::criteria::{Candidate, FilterCriteria, MatchMode};
use crate::device_type::{ContentVariable, DeviceType, Interaction, Service};
use crate::error::ScriptEnvError;
use crate::id::{AspectId, CharacteristicId, DeviceTypeId, FunctionId, ServiceId};
use crate::taxonomy::{AspectNode, TaxonomyIndex};

/// A leaf path that may be set alongside a matched path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configurable {
    pub path: String,
    pub characteristic_id: CharacteristicId,
    pub aspect_node: Option<AspectNode>,
    pub function_id: FunctionId,
    pub value: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub value_type: String,
}

/// One content-variable path of a service that satisfied the query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePathOption {
    pub service_id: ServiceId,
    pub path: String,
    pub characteristic_id: CharacteristicId,
    pub aspect_node: Option<AspectNode>,
    pub function_id: FunctionId,
    pub is_void: bool,
    pub value: Option<serde_json::Value>,
    pub is_controlling_function: bool,
    pub configurables: Vec<Configurable>,
    #[serde(rename = "type")]
    pub value_type: String,
    pub interaction: Interaction,
}

/// The services of one device type that matched, with their path options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceTypeSelectable {
    pub device_type_id: DeviceTypeId,
    pub services: Vec<Service>,
    /// Only services with at least one path option have an entry.
    pub service_path_options: BTreeMap<ServiceId, Vec<ServicePathOption>>,
}

/// Parameters of a selectable search.
#[derive(Debug, Clone, Default)]
pub struct SelectableQuery {
    pub criteria: Vec<FilterCriteria>,
    /// Dotted path (root name first) that options must lie under.
    pub path_prefix: String,
    pub include_modified: bool,
    pub mode: MatchMode,
}

impl SelectableQuery {
    #[must_use]
    pub fn new(criteria: Vec<FilterCriteria>) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn include_modified(mut self, include: bool) -> Self {
        self.include_modified = include;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A device type left out of a search because its content refers to a
/// function or aspect the index does not know.
#[derive(Debug)]
pub struct SkippedDeviceType {
    pub device_type_id: DeviceTypeId,
    pub error: ScriptEnvError,
}

/// Outcome of a search over every device type of the index.
#[derive(Debug)]
pub struct Selection<T> {
    pub matched: Vec<T>,
    pub skipped: Vec<SkippedDeviceType>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self {
            matched: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> Selection<T> {
    pub(crate) fn skip(&mut self, device_type: &DeviceType, error: ScriptEnvError) {
        self.skipped.push(SkippedDeviceType {
            device_type_id: device_type.id.clone(),
            error,
        });
    }
}

/// Run `query` over every device type of the index, in index order.
///
/// Device types that cannot be evaluated are reported in
/// [`Selection::skipped`] and do not affect the others.
#[must_use]
pub fn device_type_selectables(
    index: &TaxonomyIndex,
    query: &SelectableQuery,
) -> Selection<DeviceTypeSelectable> {
    let mut selection = Selection::default();
    for device_type in index.device_types() {
        if device_type.is_modified() && !query.include_modified {
            continue;
        }
        match select_device_type(index, device_type, query) {
            Ok(Some(selectable)) => selection.matched.push(selectable),
            Ok(None) => {}
            Err(error) => selection.skip(device_type, error),
        }
    }
    selection
}

/// Evaluate one device type; `None` when no service matched.
///
/// # Errors
///
/// Returns [`ScriptEnvError::NotFound`] when a tagged content variable
/// names a function or aspect the index does not know.
pub fn select_device_type(
    index: &TaxonomyIndex,
    device_type: &DeviceType,
    query: &SelectableQuery,
) -> Result<Option<DeviceTypeSelectable>, ScriptEnvError> {
    let mut services = Vec::new();
    let mut service_path_options = BTreeMap::new();
    for service in &device_type.services {
        let evaluation =
            evaluate_service(index, device_type, service, &query.criteria, &query.path_prefix)?;
        if !query.mode.accepts(&evaluation.satisfied) {
            continue;
        }
        if !evaluation.options.is_empty() {
            service_path_options.insert(service.id.clone(), evaluation.options);
        }
        services.push(service.clone());
    }
    if services.is_empty() {
        return Ok(None);
    }
    Ok(Some(DeviceTypeSelectable {
        device_type_id: device_type.id.clone(),
        services,
        service_path_options,
    }))
}

/// Whether every criterion is satisfied by some service of the device type.
///
/// # Errors
///
/// See [`select_device_type`].
pub fn device_type_satisfies_all(
    index: &TaxonomyIndex,
    device_type: &DeviceType,
    criteria: &[FilterCriteria],
) -> Result<bool, ScriptEnvError> {
    let mut satisfied = vec![false; criteria.len()];
    for service in &device_type.services {
        let evaluation = evaluate_service(index, device_type, service, criteria, "")?;
        for (total, current) in satisfied.iter_mut().zip(evaluation.satisfied) {
            *total |= current;
        }
    }
    Ok(MatchMode::All.accepts(&satisfied))
}

struct ServiceEvaluation {
    /// One flag per criterion.
    satisfied: Vec<bool>,
    options: Vec<ServicePathOption>,
}

fn evaluate_service(
    index: &TaxonomyIndex,
    device_type: &DeviceType,
    service: &Service,
    criteria: &[FilterCriteria],
    path_prefix: &str,
) -> Result<ServiceEvaluation, ScriptEnvError> {
    let untagged_function = FunctionId::default();
    let untagged_aspect = AspectId::default();
    let service_candidate = Candidate {
        interaction: service.interaction,
        device_class_id: &device_type.device_class_id,
        function_id: &untagged_function,
        aspect_id: &untagged_aspect,
    };
    let mut satisfied: Vec<bool> = criteria
        .iter()
        .map(|c| c.is_service_level() && c.matches(index, &service_candidate))
        .collect();
    let path_criteria_present = criteria.iter().any(|c| !c.is_service_level());

    let roots = service
        .inputs
        .iter()
        .map(|content| (&content.content_variable, true))
        .chain(service.outputs.iter().map(|content| (&content.content_variable, false)));

    let mut options = Vec::new();
    for (root, is_input) in roots {
        let flat = flatten(root);
        let mut pos = 0;
        while pos < flat.len() {
            let entry = &flat[pos];
            match scope(&entry.path, path_prefix) {
                Scope::Outside => {
                    pos = entry.end;
                    continue;
                }
                Scope::Above => {
                    pos += 1;
                    continue;
                }
                Scope::Inside => {}
            }
            let variable = entry.variable;
            pos += 1;
            if variable.function_id.is_empty() {
                continue;
            }
            let is_controlling = index.function(&variable.function_id)?.is_controlling();
            // controlling functions are set through inputs, measuring ones read from outputs
            if is_controlling != is_input || (is_controlling && variable.is_void) {
                continue;
            }
            let candidate = Candidate {
                interaction: service.interaction,
                device_class_id: &device_type.device_class_id,
                function_id: &variable.function_id,
                aspect_id: &variable.aspect_id,
            };
            let mut matched = !path_criteria_present;
            for (criterion, done) in criteria.iter().zip(satisfied.iter_mut()) {
                if !criterion.is_service_level() && criterion.matches(index, &candidate) {
                    *done = true;
                    matched = true;
                }
            }
            if matched {
                options.push(path_option(index, service, &flat, pos - 1, is_controlling)?);
            }
        }
    }
    Ok(ServiceEvaluation { satisfied, options })
}

fn path_option(
    index: &TaxonomyIndex,
    service: &Service,
    flat: &[FlatVariable<'_>],
    pos: usize,
    is_controlling: bool,
) -> Result<ServicePathOption, ScriptEnvError> {
    let entry = &flat[pos];
    let variable = entry.variable;
    let configurables = flat
        .iter()
        .enumerate()
        .filter(|(other_pos, _)| *other_pos < pos || *other_pos >= entry.end)
        .map(|(_, other)| other)
        .filter(|other| {
            other.variable.is_leaf()
                && !other.variable.is_void
                && !other.variable.characteristic_id.is_empty()
        })
        .map(|other| -> Result<Configurable, ScriptEnvError> {
            Ok(Configurable {
                path: other.path.clone(),
                characteristic_id: other.variable.characteristic_id.clone(),
                aspect_node: resolve_aspect(index, &other.variable.aspect_id)?,
                function_id: other.variable.function_id.clone(),
                value: other.variable.value.clone(),
                value_type: other.variable.value_type.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ServicePathOption {
        service_id: service.id.clone(),
        path: entry.path.clone(),
        characteristic_id: variable.characteristic_id.clone(),
        aspect_node: resolve_aspect(index, &variable.aspect_id)?,
        function_id: variable.function_id.clone(),
        is_void: variable.is_void,
        value: variable.value.clone(),
        is_controlling_function: is_controlling,
        configurables,
        value_type: variable.value_type.clone(),
        interaction: service.interaction,
    })
}

fn resolve_aspect(
    index: &TaxonomyIndex,
    id: &AspectId,
) -> Result<Option<AspectNode>, ScriptEnvError> {
    if id.is_empty() {
        return Ok(None);
    }
    index.aspect_node(id).map(|node| Some(node.clone()))
}

/// A content variable with its dotted path and the position just past its
/// subtree in the flattened list.
struct FlatVariable<'a> {
    variable: &'a ContentVariable,
    path: String,
    end: usize,
}

fn flatten(root: &ContentVariable) -> Vec<FlatVariable<'_>> {
    let mut flat: Vec<FlatVariable<'_>> = Vec::new();
    let mut depths: Vec<usize> = Vec::new();
    let mut stack = vec![(root, root.name.clone(), 0usize)];
    while let Some((variable, path, depth)) = stack.pop() {
        for child in variable.sub_content_variables.iter().rev() {
            stack.push((child, format!("{path}.{}", child.name), depth + 1));
        }
        flat.push(FlatVariable {
            variable,
            path,
            end: 0,
        });
        depths.push(depth);
    }

    // a subtree ends at the next entry that is not deeper
    let mut open: Vec<usize> = Vec::new();
    for (pos, depth) in depths.iter().enumerate() {
        while let Some(&top) = open.last() {
            if depths[top] < *depth {
                break;
            }
            flat[top].end = pos;
            open.pop();
        }
        open.push(pos);
    }
    let len = flat.len();
    for pos in open {
        flat[pos].end = len;
    }
    flat
}

enum Scope {
    /// At or below the prefix.
    Inside,
    /// On the way to the prefix; descend without matching.
    Above,
    /// Neither; the whole subtree is skipped.
    Outside,
}

fn scope(path: &str, prefix: &str) -> Scope {
    let is_segment_prefix =
        |long: &str, short: &str| long.strip_prefix(short).is_some_and(|rest| rest.starts_with('.'));
    if prefix.is_empty() || path == prefix || is_segment_prefix(path, prefix) {
        Scope::Inside
    } else if is_segment_prefix(prefix, path) {
        Scope::Above
    } else {
        Scope::Outside
    }
}
