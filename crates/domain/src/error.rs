//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ScriptEnvError`] via `#[from]` so a script host can raise a failure
//! carrying the [`ErrorKind`] and the offending identifier or name.

use std::fmt;

/// Top-level error surfaced to script callers.
#[derive(Debug, thiserror::Error)]
pub enum ScriptEnvError {
    /// An unknown id was passed to a lookup.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A variable was referenced or read before it was ever written.
    #[error("unknown variable {0:?}")]
    UnknownVariable(String),

    /// A string did not match the `{{.<name>}}` reference grammar.
    #[error(transparent)]
    MalformedReference(#[from] MalformedReferenceError),

    /// Serialized input (json, sort keys, aspect forests) could not be decoded.
    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),

    /// The device repository (or another collaborator) failed to answer.
    #[error("repository unavailable")]
    RepositoryUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Discriminant of a [`ScriptEnvError`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    UnknownVariable,
    MalformedReference,
    MalformedInput,
    RepositoryUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "NotFound",
            Self::UnknownVariable => "UnknownVariable",
            Self::MalformedReference => "MalformedReference",
            Self::MalformedInput => "MalformedInput",
            Self::RepositoryUnavailable => "RepositoryUnavailable",
        })
    }
}

impl ScriptEnvError {
    /// Wrap a collaborator failure.
    pub fn unavailable(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::RepositoryUnavailable(err.into())
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::UnknownVariable(_) => ErrorKind::UnknownVariable,
            Self::MalformedReference(_) => ErrorKind::MalformedReference,
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::RepositoryUnavailable(_) => ErrorKind::RepositoryUnavailable,
        }
    }

    /// The identifier, variable name or raw input the failure is about.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::NotFound(err) => Some(&err.id),
            Self::UnknownVariable(name) => Some(name),
            Self::MalformedReference(err) => Some(&err.input),
            Self::MalformedInput(_) | Self::RepositoryUnavailable(_) => None,
        }
    }
}

/// A lookup by id found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id:?} not found")]
pub struct NotFoundError {
    /// Record kind, e.g. `"AspectNode"`.
    pub entity: &'static str,
    pub id: String,
}

impl NotFoundError {
    pub fn new(entity: &'static str, id: impl fmt::Display) -> Self {
        Self {
            entity,
            id: id.to_string(),
        }
    }
}

/// Why a reference string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceProblem {
    MissingPrefix,
    MissingSuffix,
}

impl fmt::Display for ReferenceProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingPrefix => "missing '{{.' prefix",
            Self::MissingSuffix => "missing '}}' suffix",
        })
    }
}

/// A string did not match the `{{.<name>}}` grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{input:?} is not a valid reference: {problem}")]
pub struct MalformedReferenceError {
    pub input: String,
    pub problem: ReferenceProblem,
}

/// Serialized input could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum MalformedInputError {
    #[error("invalid json")]
    Json(#[from] serde_json::Error),

    #[error("duplicate {entity} id {id:?}")]
    DuplicateId { entity: &'static str, id: String },

    #[error("unsupported sort key {0:?}")]
    SortKey(String),

    #[error("iot option has more than one selection set: {0}")]
    AmbiguousIotOption(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_kind_and_subject_for_not_found() {
        let err: ScriptEnvError = NotFoundError::new("AspectNode", "air").into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.subject(), Some("air"));
        assert_eq!(err.to_string(), "AspectNode \"air\" not found");
    }

    #[test]
    fn should_name_variable_in_unknown_variable_message() {
        let err = ScriptEnvError::UnknownVariable("t".to_string());
        assert_eq!(err.kind(), ErrorKind::UnknownVariable);
        assert_eq!(err.subject(), Some("t"));
        assert_eq!(err.to_string(), "unknown variable \"t\"");
    }

    #[test]
    fn should_describe_malformed_reference() {
        let err: ScriptEnvError = MalformedReferenceError {
            input: "t}}".to_string(),
            problem: ReferenceProblem::MissingPrefix,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::MalformedReference);
        assert!(err.to_string().contains("missing '{{.' prefix"));
    }

    #[test]
    fn should_convert_json_error_to_malformed_input() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err: ScriptEnvError = MalformedInputError::from(json_err).into();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.subject().is_none());
    }

    #[test]
    fn should_wrap_collaborator_failure_as_unavailable() {
        let err = ScriptEnvError::unavailable("connection refused");
        assert_eq!(err.kind(), ErrorKind::RepositoryUnavailable);
        assert_eq!(err.kind().to_string(), "RepositoryUnavailable");
    }
}
