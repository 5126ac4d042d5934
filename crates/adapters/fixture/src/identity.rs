//! [`IdentityProvider`] issuing locally minted tokens.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use scriptenv_app::ports::IdentityProvider;
use scriptenv_domain::error::ScriptEnvError;
use scriptenv_domain::identity::UserToken;
use scriptenv_domain::time::{after_secs, now};

/// Issues `fixture-<user>-<serial>` tokens valid for a fixed TTL.
pub struct StaticIdentity {
    ttl_secs: u64,
    serial: AtomicU64,
}

impl StaticIdentity {
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl_secs,
            serial: AtomicU64::new(0),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn exchange_user_token(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<UserToken, ScriptEnvError>> + Send {
        let serial = self.serial.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(user_id, serial, "issuing fixture token");
        let token = UserToken {
            token: format!("fixture-{user_id}-{serial}"),
            expires_at: after_secs(now(), self.ttl_secs),
        };
        async move { Ok(token) }
    }
}
