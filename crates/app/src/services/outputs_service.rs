//! `outputs` namespace — values the task hands to downstream tasks.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use scriptenv_domain::error::{MalformedInputError, NotFoundError, ScriptEnvError};

/// Application service behind the `outputs` namespace.
#[derive(Debug, Clone, Default)]
pub struct OutputsService {
    outputs: BTreeMap<String, Value>,
}

impl OutputsService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] when the output was never set.
    pub fn get(&self, name: &str) -> Result<&Value, ScriptEnvError> {
        self.outputs
            .get(name)
            .ok_or_else(|| NotFoundError::new("Output", name).into())
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.outputs.insert(name.into(), value);
    }

    /// Store `value` as its compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::MalformedInput`] when `value` cannot be
    /// serialized.
    pub fn set_json(
        &mut self,
        name: impl Into<String>,
        value: &impl Serialize,
    ) -> Result<(), ScriptEnvError> {
        let text = serde_json::to_string(value).map_err(MalformedInputError::Json)?;
        self.outputs.insert(name.into(), Value::String(text));
        Ok(())
    }

    #[must_use]
    pub fn outputs(&self) -> &BTreeMap<String, Value> {
        &self.outputs
    }

    #[must_use]
    pub fn into_outputs(self) -> BTreeMap<String, Value> {
        self.outputs
    }
}
