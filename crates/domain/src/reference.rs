//! Variable references (`{{.name}}`) and template rendering.

use serde_json::Value;

use crate::error::{MalformedReferenceError, ReferenceProblem, ScriptEnvError};

pub const REFERENCE_PREFIX: &str = "{{.";
pub const REFERENCE_SUFFIX: &str = "}}";

/// Built-in escapes, shadowed by variables of the same name.
const BUILTINS: [(&str, &str); 2] = [("brl", "{{"), ("brr", "}}")];

/// One or more characters, none of them a brace or whitespace.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c == '{' || c == '}' || c.is_whitespace())
}

/// The reference text for `name`. Any name is accepted, so
/// [`parse_reference`] always gives it back.
#[must_use]
pub fn format_reference(name: &str) -> String {
    format!("{REFERENCE_PREFIX}{name}{REFERENCE_SUFFIX}")
}

/// Extract the variable name from a reference by removing its delimiters.
/// The name itself is not checked.
///
/// # Errors
///
/// Returns [`ScriptEnvError::MalformedReference`] when `reference` does not
/// start with `{{.` or does not end with `}}`.
pub fn parse_reference(reference: &str) -> Result<&str, ScriptEnvError> {
    let rest = reference
        .strip_prefix(REFERENCE_PREFIX)
        .ok_or_else(|| malformed(reference, ReferenceProblem::MissingPrefix))?;
    rest.strip_suffix(REFERENCE_SUFFIX)
        .ok_or_else(|| malformed(reference, ReferenceProblem::MissingSuffix))
}

fn malformed(input: &str, problem: ReferenceProblem) -> ScriptEnvError {
    MalformedReferenceError {
        input: input.to_string(),
        problem,
    }
    .into()
}

/// Text inserted for a value: strings raw, everything else as compact JSON.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Replace every well-formed reference in `template`, left to right, in one
/// pass. Text that looks like a reference but has an invalid name is kept.
///
/// # Errors
///
/// Returns [`ScriptEnvError::UnknownVariable`] for the first reference that
/// neither `lookup` nor a built-in resolves; no partial output is produced.
pub fn render_template(
    template: &str,
    lookup: impl Fn(&str) -> Option<Value>,
) -> Result<String, ScriptEnvError> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(REFERENCE_PREFIX) {
        let after_prefix = &rest[start + REFERENCE_PREFIX.len()..];
        let Some(name_len) = after_prefix.find(REFERENCE_SUFFIX) else {
            break;
        };
        let name = &after_prefix[..name_len];
        if !is_valid_name(name) {
            // keep the first brace and look for the next opening
            output.push_str(&rest[..=start]);
            rest = &rest[start + 1..];
            continue;
        }
        output.push_str(&rest[..start]);
        output.push_str(&resolve(name, &lookup)?);
        rest = &after_prefix[name_len + REFERENCE_SUFFIX.len()..];
    }
    output.push_str(rest);
    Ok(output)
}

fn resolve(name: &str, lookup: &impl Fn(&str) -> Option<Value>) -> Result<String, ScriptEnvError> {
    if let Some(value) = lookup(name) {
        return Ok(render_value(&value));
    }
    BUILTINS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, text)| (*text).to_string())
        .ok_or_else(|| ScriptEnvError::UnknownVariable(name.to_string()))
}
