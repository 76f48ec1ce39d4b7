use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Kind of an issued token.
///
/// Access tokens are short-lived and authorize individual requests;
/// refresh tokens are long-lived and obtain new access tokens. Exactly one
/// refresh token is current per principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by an issued token.
///
/// Every field is covered by the signature; none can be tampered with
/// undetected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Principal identifier the token is bound to
    pub sub: String,

    /// Token kind (access or refresh)
    pub kind: TokenKind,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a principal with an expiry horizon from now.
    ///
    /// # Arguments
    /// * `principal_id` - Principal identifier to bind the token to
    /// * `kind` - Token kind
    /// * `ttl` - Duration until the token expires
    ///
    /// # Returns
    /// Claims with sub, kind, iat, and exp set
    pub fn new(principal_id: impl ToString, kind: TokenKind, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: principal_id.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Check if the claims are expired at the given instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
