//! Fixture adapter error types.

use std::path::PathBuf;

use scriptenv_domain::error::ScriptEnvError;

/// Errors specific to the fixture adapter.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("cannot read fixture {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fixture is not valid JSON or does not match the expected shape.
    #[error("invalid fixture")]
    Decode(#[from] serde_json::Error),

    /// A per-user read was attempted without a token.
    #[error("missing user token")]
    MissingToken,
}

impl From<FixtureError> for ScriptEnvError {
    fn from(err: FixtureError) -> Self {
        Self::unavailable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptenv_domain::error::ErrorKind;

    #[test]
    fn should_display_read_error_with_path() {
        let err = FixtureError::Read {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.to_string(), "cannot read fixture missing.json");
    }

    #[test]
    fn should_convert_to_repository_unavailable() {
        let err: ScriptEnvError = FixtureError::MissingToken.into();
        assert_eq!(err.kind(), ErrorKind::RepositoryUnavailable);
    }
}
