//! Identity — the user a task runs on behalf of and their access token.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Seconds before `expires_at` at which a token is already treated as stale,
/// so it does not expire while a repository request is in flight.
pub const EXPIRY_LEEWAY_SECS: i64 = 10;

/// A short-lived, opaque access token issued for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserToken {
    /// Raw bearer token (a JWT in production).
    pub token: String,
    pub expires_at: Timestamp,
}

impl UserToken {
    /// Whether the token may still be handed out at `now`.
    #[must_use]
    pub fn is_usable_at(&self, now: Timestamp) -> bool {
        (self.expires_at - now).num_seconds() > EXPIRY_LEEWAY_SECS
    }
}
