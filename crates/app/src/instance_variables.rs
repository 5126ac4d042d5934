//! In-process variable store for one workflow-instance task.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::ports::VariableStore;

/// The instance's variables as loaded before the task, plus everything the
/// script wrote while it ran.
#[derive(Debug, Clone, Default)]
pub struct InstanceVariables {
    values: BTreeMap<String, Value>,
    updates: BTreeMap<String, Value>,
}

impl InstanceVariables {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            values: values.into_iter().collect(),
            updates: BTreeMap::new(),
        }
    }

    /// Variables written during this task, latest value per name.
    #[must_use]
    pub fn updates(&self) -> &BTreeMap<String, Value> {
        &self.updates
    }

    #[must_use]
    pub fn into_updates(self) -> BTreeMap<String, Value> {
        self.updates
    }
}

impl VariableStore for InstanceVariables {
    fn read(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    fn write(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value.clone());
        self.updates.insert(name.to_string(), value);
    }

    fn exists(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}
