//! `variables` namespace — instance variables and `{{.name}}` references.

use serde_json::Value;

use scriptenv_domain::error::ScriptEnvError;
use scriptenv_domain::reference::{format_reference, parse_reference, render_template};

use crate::ports::VariableStore;

/// Application service behind the `variables` namespace.
pub struct VariablesService<S> {
    store: S,
}

impl<S: VariableStore> VariablesService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn write(&mut self, name: &str, value: Value) {
        tracing::trace!(name, "variable written");
        self.store.write(name, value);
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::UnknownVariable`] when `name` was never written.
    pub fn read(&self, name: &str) -> Result<Value, ScriptEnvError> {
        self.store
            .read(name)
            .ok_or_else(|| ScriptEnvError::UnknownVariable(name.to_string()))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.store.exists(name)
    }

    /// The reference text for an existing variable.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::UnknownVariable`] when `name` does not exist.
    pub fn reference(&self, name: &str) -> Result<String, ScriptEnvError> {
        if !self.store.exists(name) {
            return Err(ScriptEnvError::UnknownVariable(name.to_string()));
        }
        Ok(format_reference(name))
    }

    /// # Errors
    ///
    /// Returns [`ScriptEnvError::MalformedReference`] when `reference` is not
    /// `{{.<name>}}`.
    pub fn deref_name<'r>(&self, reference: &'r str) -> Result<&'r str, ScriptEnvError> {
        parse_reference(reference)
    }

    /// # Errors
    ///
    /// As [`deref_name`](Self::deref_name), then as [`read`](Self::read).
    pub fn deref_value(&self, reference: &str) -> Result<Value, ScriptEnvError> {
        self.read(parse_reference(reference)?)
    }

    /// Substitute every reference in `template`.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptEnvError::UnknownVariable`] naming the first reference
    /// that does not resolve.
    pub fn deref_template(&self, template: &str) -> Result<String, ScriptEnvError> {
        render_template(template, |name| self.store.read(name))
    }
}
