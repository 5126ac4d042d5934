//! Variable store port — named values of one workflow instance.

use serde_json::Value;

/// Keyed variable storage scoped to one task execution.
///
/// Accessed synchronously: a task's script runs single-threaded.
pub trait VariableStore {
    fn read(&self, name: &str) -> Option<Value>;

    fn write(&mut self, name: &str, value: Value);

    fn exists(&self, name: &str) -> bool {
        self.read(name).is_some()
    }
}
