//! `inputs` namespace — the task's read-only process inputs.

use std::collections::BTreeMap;

use serde_json::Value;

use scriptenv_domain::error::{NotFoundError, ScriptEnvError};

/// Inputs whose names start with one of these belong to the worker's own
/// pre/post scripts and are never shown to the task script.
const HIDDEN_PREFIXES: [&str; 2] = ["prescript", "postscript"];

/// Application service behind the `inputs` namespace.
#[derive(Debug, Clone, Default)]
pub struct InputsService {
    inputs: BTreeMap<String, Value>,
}

impl InputsService {
    #[must_use]
    pub fn new(inputs: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            inputs: inputs
                .into_iter()
                .filter(|(name, _)| !is_hidden(name))
                .collect(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::NotFound`] when no input has that name.
    pub fn get(&self, name: &str) -> Result<&Value, ScriptEnvError> {
        self.inputs
            .get(name)
            .ok_or_else(|| NotFoundError::new("Input", name).into())
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    /// Values ordered by input name.
    #[must_use]
    pub fn list(&self) -> Vec<&Value> {
        self.inputs.values().collect()
    }

    #[must_use]
    pub fn list_names(&self) -> Vec<&str> {
        self.inputs.keys().map(String::as_str).collect()
    }
}

fn is_hidden(name: &str) -> bool {
    HIDDEN_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptenv_domain::error::ErrorKind;
    use serde_json::json;

    fn make_service() -> InputsService {
        InputsService::new([
            ("zeta".to_string(), json!(3)),
            ("alpha".to_string(), json!("a")),
            ("prescript_code".to_string(), json!("x = 1")),
            ("postscript_code".to_string(), json!("y = 2")),
        ])
    }

    #[test]
    fn should_list_values_and_names_sorted_by_name() {
        let service = make_service();
        assert_eq!(service.list_names(), ["alpha", "zeta"]);
        assert_eq!(service.list(), [&json!("a"), &json!(3)]);
    }

    #[test]
    fn should_hide_script_hook_inputs() {
        let service = make_service();
        assert!(!service.exists("prescript_code"));
        let err = service.get("postscript_code").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn should_return_input_when_present() {
        assert_eq!(make_service().get("zeta").unwrap(), &json!(3));
    }
}
