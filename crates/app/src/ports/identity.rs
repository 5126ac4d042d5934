//! Identity port — user tokens for device-repository reads.

use std::future::Future;

use scriptenv_domain::error::ScriptEnvError;
use scriptenv_domain::identity::UserToken;

/// Issues short-lived access tokens on behalf of a user.
pub trait IdentityProvider: Send + Sync {
    /// Exchange `user_id` for a fresh token.
    fn exchange_user_token(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<UserToken, ScriptEnvError>> + Send;
}

impl<T: IdentityProvider> IdentityProvider for std::sync::Arc<T> {
    fn exchange_user_token(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<UserToken, ScriptEnvError>> + Send {
        (**self).exchange_user_token(user_id)
    }
}
