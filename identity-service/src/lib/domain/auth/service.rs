use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenIssuer;
use auth::TokenKind;
use chrono::Utc;

use crate::domain::auth::codes::VerificationCodes;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::CodeError;
use crate::domain::auth::errors::RepositoryError;
use crate::domain::auth::models::CodePurpose;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::Principal;
use crate::domain::auth::models::PrincipalId;
use crate::domain::auth::models::Registration;
use crate::domain::auth::models::StoredCredentials;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::ports::AuthRepository;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::CodeNotifier;

/// Upper bound on the detached registration dispatch so it cannot leak.
const DETACHED_DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Authentication orchestrator.
///
/// Sequences the credential hasher, token issuer, and verification code
/// service together with the repository and notifier collaborators. The
/// service itself is stateless; all mutable state lives in the repository.
pub struct AuthService<R, N>
where
    R: AuthRepository,
    N: CodeNotifier,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    codes: VerificationCodes<R>,
    password_hasher: PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
}

impl<R, N> AuthService<R, N>
where
    R: AuthRepository,
    N: CodeNotifier,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Principal and code persistence implementation
    /// * `notifier` - Out-of-band code delivery implementation
    /// * `token_issuer` - Process-wide token issuer, built once at startup
    ///
    /// # Returns
    /// Configured authentication service instance
    pub fn new(repository: Arc<R>, notifier: Arc<N>, token_issuer: Arc<TokenIssuer>) -> Self {
        Self {
            codes: VerificationCodes::new(Arc::clone(&repository)),
            repository,
            notifier,
            password_hasher: PasswordHasher::new(),
            token_issuer,
        }
    }

    fn issue_pair(&self, principal_id: &PrincipalId) -> Result<TokenPair, AuthError> {
        let id = principal_id.to_string();
        let refresh_token = self.token_issuer.issue(&id, TokenKind::Refresh)?;
        let access_token = self.token_issuer.issue(&id, TokenKind::Access)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Deliver a code without blocking or failing the caller.
    ///
    /// Runs as an independent, unawaited unit of work with a bounded
    /// lifetime; the outcome is observed only through logging.
    fn dispatch_code_detached(&self, code: String, email: EmailAddress) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            let send = notifier.send_code(&code, &email);
            match tokio::time::timeout(DETACHED_DISPATCH_TIMEOUT, send).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!(error = %e, email = %email, "Failed to deliver verification code");
                }
                Err(_) => {
                    tracing::error!(email = %email, "Verification code delivery timed out");
                }
            }
        });
    }
}

#[async_trait]
impl<R, N> AuthServicePort for AuthService<R, N>
where
    R: AuthRepository,
    N: CodeNotifier,
{
    async fn register(
        &self,
        email: EmailAddress,
        password: String,
    ) -> Result<Registration, AuthError> {
        tracing::debug!(email = %email, "Registering account");

        let password_hash = self.password_hasher.hash(&password)?;

        let principal_id = PrincipalId::new();
        let tokens = self.issue_pair(&principal_id)?;

        let principal = Principal {
            id: principal_id,
            email: email.clone(),
            password_hash,
            refresh_token: Some(tokens.refresh_token.clone()),
            created_at: Utc::now(),
        };

        // Failure here aborts before any token escapes to a caller; no
        // compensating revocation is needed.
        self.repository
            .register(principal)
            .await
            .map_err(|e| AuthError::RegistrationFailed(e.to_string()))?;

        let code = self.codes.generate();

        // Fire-and-forget: a missing email is recoverable by requesting a
        // fresh code, so a slow or down mail system must not fail the call.
        self.dispatch_code_detached(code.clone(), email.clone());

        // A missing record of the code is not recoverable without retry, so
        // persistence stays on the synchronous path.
        self.codes
            .record(&code, &email, CodePurpose::Registration)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        Ok(Registration {
            principal_id,
            tokens,
        })
    }

    async fn login(&self, email: EmailAddress, password: String) -> Result<TokenPair, AuthError> {
        tracing::debug!(email = %email, "Authenticating login");

        let StoredCredentials {
            principal_id,
            password_hash,
        } = self
            .repository
            .get_hash_and_id(&email)
            .await
            .map_err(|e| match e {
                RepositoryError::AccountNotFound => AuthError::InvalidCredentials,
                e => AuthError::Repository(e.to_string()),
            })?;

        match self.password_hasher.verify(&password, &password_hash) {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(AuthError::Password(e)),
        }

        let tokens = self.issue_pair(&principal_id)?;

        self.repository
            .login(&email, &tokens.refresh_token)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        Ok(tokens)
    }

    async fn password_recovery(&self, credentials: Credentials) -> Result<(), AuthError> {
        tracing::debug!(email = %credentials.email, "Recovering password");

        let password_hash = self.password_hasher.hash(&credentials.password)?;

        self.repository
            .password_recovery(&credentials.email, &password_hash)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        Ok(())
    }

    async fn email_send_code(&self, email: EmailAddress) -> Result<(), AuthError> {
        tracing::debug!(email = %email, "Sending verification code");

        let code = self.codes.generate();

        // Synchronous dispatch, unlike register: abort before persistence
        // if the notifier fails.
        self.notifier.send_code(&code, &email).await?;

        self.codes
            .record(&code, &email, CodePurpose::Recovery)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        Ok(())
    }

    async fn email_verify_code(
        &self,
        code: &str,
        email: EmailAddress,
        purpose: CodePurpose,
    ) -> Result<TokenPair, AuthError> {
        tracing::debug!(email = %email, purpose = %purpose, "Verifying code");

        let principal_id = self
            .codes
            .redeem(code, &email, purpose)
            .await
            .map_err(|e| match e {
                CodeError::Invalid | CodeError::Expired | CodeError::Consumed => {
                    AuthError::CodeRedemptionFailed
                }
                CodeError::Repository(e) => AuthError::Repository(e),
            })?;

        let tokens = self.issue_pair(&principal_id)?;

        self.repository
            .update_refresh_token(&principal_id, &tokens.refresh_token)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        Ok(tokens)
    }
}
