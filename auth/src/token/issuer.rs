use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenKind;
use super::errors::TokenError;

/// Issuer of signed, time-bounded bearer tokens.
///
/// Mints access and refresh tokens bound to a principal identifier, each
/// kind with its own fixed expiry horizon. Uses HS256 (HMAC with SHA-256).
///
/// Signing material is process-wide configuration: construct one issuer at
/// startup and inject it; key rotation is out of scope.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `access_ttl` - Expiry horizon for access tokens (short)
    /// * `refresh_ttl` - Expiry horizon for refresh tokens (long)
    ///
    /// # Returns
    /// TokenIssuer configured with HS256
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a signed token bound to a principal.
    ///
    /// The token encodes the principal identifier, kind, issuance time, and
    /// expiry time, all covered by the signature.
    ///
    /// # Arguments
    /// * `principal_id` - Principal identifier to bind the token to
    /// * `kind` - Token kind, selecting the expiry horizon
    ///
    /// # Returns
    /// Signed token string
    ///
    /// # Errors
    /// * `SigningFailed` - Token signing failed
    pub fn issue(&self, principal_id: &str, kind: TokenKind) -> Result<String, TokenError> {
        let claims = Claims::new(principal_id, kind, self.ttl_for(kind));
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Verify a token's signature and expiry, and decode its claims.
    ///
    /// # Arguments
    /// * `token` - Token string to verify
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `Expired` - Token has expired
    /// * `InvalidSignature` - Token signature does not verify
    /// * `Malformed` - Token is not a well-formed JWT
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(self.algorithm);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    fn ttl_for(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            b"test_secret_key_at_least_32_bytes!",
            Duration::minutes(15),
            Duration::days(30),
        )
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer();

        let token = issuer
            .issue("principal-1", TokenKind::Access)
            .expect("Failed to issue token");
        assert!(!token.is_empty());

        let claims = issuer.verify(&token).expect("Failed to verify token");
        assert_eq!(claims.sub, "principal-1");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_access_expires_before_refresh() {
        let issuer = issuer();

        let access = issuer
            .issue("principal-1", TokenKind::Access)
            .expect("Failed to issue token");
        let refresh = issuer
            .issue("principal-1", TokenKind::Refresh)
            .expect("Failed to issue token");

        let access_claims = issuer.verify(&access).expect("Failed to verify token");
        let refresh_claims = issuer.verify(&refresh).expect("Failed to verify token");

        assert!(access_claims.exp < refresh_claims.exp);
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let issuer1 = TokenIssuer::new(
            b"secret1_at_least_32_bytes_long_key!",
            Duration::minutes(15),
            Duration::days(30),
        );
        let issuer2 = TokenIssuer::new(
            b"secret2_at_least_32_bytes_long_key!",
            Duration::minutes(15),
            Duration::days(30),
        );

        let token = issuer1
            .issue("principal-1", TokenKind::Refresh)
            .expect("Failed to issue token");

        let result = issuer2.verify(&token);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_verify_expired_token() {
        // Negative TTL backdates expiry past the default leeway
        let issuer = TokenIssuer::new(
            b"test_secret_key_at_least_32_bytes!",
            Duration::minutes(-10),
            Duration::days(30),
        );

        let token = issuer
            .issue("principal-1", TokenKind::Access)
            .expect("Failed to issue token");

        let result = issuer.verify(&token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_malformed_token() {
        let issuer = issuer();

        let result = issuer.verify("not.a.token");
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }
}
