//! The user a task runs for, and that user's lazily exchanged token.

use tokio::sync::Mutex;

use scriptenv_domain::error::ScriptEnvError;
use scriptenv_domain::identity::UserToken;
use scriptenv_domain::time::now;

use crate::ports::IdentityProvider;

/// Per-task identity. The token is exchanged on first use, cached, and
/// exchanged again once it is about to expire.
pub struct UserSession<I> {
    user_id: String,
    identity: I,
    token: Mutex<Option<UserToken>>,
}

impl<I: IdentityProvider> UserSession<I> {
    pub fn new(user_id: impl Into<String>, identity: I) -> Self {
        Self {
            user_id: user_id.into(),
            identity,
            token: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// A token that is valid for at least the expiry leeway.
    ///
    /// # Errors
    ///
    /// Propagates failures of the identity provider.
    #[tracing::instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn user_token(&self) -> Result<String, ScriptEnvError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && token.is_usable_at(now())
        {
            return Ok(token.token.clone());
        }
        let token = self.identity.exchange_user_token(&self.user_id).await?;
        tracing::debug!(expires_at = %token.expires_at, "user token exchanged");
        let raw = token.token.clone();
        *cached = Some(token);
        Ok(raw)
    }
}
