//! Reference resolution over task inputs, run before a task handler sees them.

use std::collections::BTreeMap;

use serde_json::Value;

use scriptenv_domain::error::ScriptEnvError;
use scriptenv_domain::reference::render_template;

use crate::ports::VariableStore;

/// Render every string-valued input as a template over `variables`;
/// other values pass through untouched.
///
/// # Errors
///
/// Returns [`ScriptEnvError::UnknownVariable`] for the first input that
/// references a variable the store does not hold.
#[tracing::instrument(skip_all, fields(inputs = inputs.len()))]
pub fn resolve_task_inputs<S: VariableStore>(
    inputs: BTreeMap<String, Value>,
    variables: &S,
) -> Result<BTreeMap<String, Value>, ScriptEnvError> {
    inputs
        .into_iter()
        .map(|(name, value)| match value {
            Value::String(template) => {
                let rendered = render_template(&template, |key| variables.read(key))?;
                Ok((name, Value::String(rendered)))
            }
            other => Ok((name, other)),
        })
        .collect()
}
