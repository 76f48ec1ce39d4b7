use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::NotifierError;
use crate::domain::auth::errors::RepositoryError;
use crate::domain::auth::models::CodePurpose;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::Principal;
use crate::domain::auth::models::PrincipalId;
use crate::domain::auth::models::Registration;
use crate::domain::auth::models::StoredCredentials;
use crate::domain::auth::models::TokenPair;

/// Port for the authentication orchestrator.
///
/// The only surface exposed to callers; the transport layer adapts
/// requests onto these five operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `email` - Validated email address (unique lookup key)
    /// * `password` - Plaintext password (hashed before storage)
    ///
    /// # Returns
    /// New principal identifier plus a fresh token pair. The account is
    /// unverified until a registration-purpose code is redeemed.
    ///
    /// # Errors
    /// * `Password` - Password hashing failed
    /// * `Token` - Token issuance failed
    /// * `RegistrationFailed` - Persistence rejected the record (e.g.
    ///   duplicate email); no tokens are returned
    /// * `Repository` - Verification code persistence failed
    async fn register(&self, email: EmailAddress, password: String)
        -> Result<Registration, AuthError>;

    /// Authenticate with email and password.
    ///
    /// # Arguments
    /// * `email` - Email address to look up
    /// * `password` - Plaintext password to verify
    ///
    /// # Returns
    /// Fresh token pair; the previous refresh token is superseded.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    ///   (indistinguishable by design)
    /// * `Token` - Token issuance failed
    /// * `Repository` - Refresh token rotation failed
    async fn login(&self, email: EmailAddress, password: String) -> Result<TokenPair, AuthError>;

    /// Replace an account's password.
    ///
    /// Replaces the stored hash unconditionally. The caller must only invoke
    /// this after a recovery-purpose `email_verify_code` has authenticated
    /// the requester; that ordering is the edge layer's contract and is not
    /// re-checked here.
    ///
    /// # Arguments
    /// * `credentials` - Email plus the new plaintext password
    ///
    /// # Errors
    /// * `Password` - Password hashing failed
    /// * `Repository` - Persistence failed
    async fn password_recovery(&self, credentials: Credentials) -> Result<(), AuthError>;

    /// Generate and deliver a recovery verification code.
    ///
    /// Dispatch is synchronous: a notifier failure aborts before the code
    /// is persisted.
    ///
    /// # Arguments
    /// * `email` - Address to send the code to
    ///
    /// # Errors
    /// * `Notification` - Outbound email failed
    /// * `Repository` - Code persistence failed
    async fn email_send_code(&self, email: EmailAddress) -> Result<(), AuthError>;

    /// Redeem a verification code and open a fresh session.
    ///
    /// Unifies "confirm my email" and "I proved control of this email, log
    /// me in"; the code's purpose tag decides which flow it satisfies.
    ///
    /// # Arguments
    /// * `code` - The code as delivered out-of-band
    /// * `email` - Address the code was issued for
    /// * `purpose` - Purpose the code must have been issued for
    ///
    /// # Returns
    /// Fresh token pair for the principal the code belongs to.
    ///
    /// # Errors
    /// * `CodeRedemptionFailed` - Code invalid, expired, or already used
    ///   (indistinguishable by design)
    /// * `Token` - Token issuance failed
    /// * `Repository` - Refresh token rotation failed
    async fn email_verify_code(
        &self,
        code: &str,
        email: EmailAddress,
        purpose: CodePurpose,
    ) -> Result<TokenPair, AuthError>;
}

/// Persistence operations for principals and verification codes.
///
/// Implementations own all mutable state and its consistency: email
/// uniqueness, at most one authoritative code per (email, purpose), code
/// expiry, and atomic single-use redemption.
#[async_trait]
pub trait AuthRepository: Send + Sync + 'static {
    /// Persist a new principal record.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Storage` - Persistence failed
    async fn register(&self, principal: Principal) -> Result<(), RepositoryError>;

    /// Look up the stored hash and identifier for an email.
    ///
    /// # Errors
    /// * `AccountNotFound` - No principal with this email
    /// * `Storage` - Persistence failed
    async fn get_hash_and_id(&self, email: &EmailAddress)
        -> Result<StoredCredentials, RepositoryError>;

    /// Rotate the current refresh token for the principal with this email.
    ///
    /// # Errors
    /// * `AccountNotFound` - No principal with this email
    /// * `Storage` - Persistence failed
    async fn login(&self, email: &EmailAddress, refresh_token: &str)
        -> Result<(), RepositoryError>;

    /// Replace the stored password hash for an email.
    ///
    /// # Errors
    /// * `AccountNotFound` - No principal with this email
    /// * `Storage` - Persistence failed
    async fn password_recovery(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<(), RepositoryError>;

    /// Store a verification code keyed to an email and purpose.
    ///
    /// Supersedes any previously authoritative code for the same
    /// (email, purpose) pair.
    ///
    /// # Errors
    /// * `Storage` - Persistence failed
    async fn email_add_code(
        &self,
        code: &str,
        email: &EmailAddress,
        purpose: CodePurpose,
    ) -> Result<(), RepositoryError>;

    /// Atomically validate and consume a verification code.
    ///
    /// On success the code is permanently unusable and the owning
    /// principal's identifier is returned.
    ///
    /// # Errors
    /// * `CodeNotFound` - No such code for this email and purpose
    /// * `CodeExpired` - Code validity window has passed
    /// * `CodeConsumed` - Code was already redeemed
    /// * `Storage` - Persistence failed
    async fn email_verify_code(
        &self,
        code: &str,
        email: &EmailAddress,
        purpose: CodePurpose,
    ) -> Result<PrincipalId, RepositoryError>;

    /// Replace the current refresh token for a principal by identifier.
    ///
    /// # Errors
    /// * `AccountNotFound` - No principal with this identifier
    /// * `Storage` - Persistence failed
    async fn update_refresh_token(
        &self,
        id: &PrincipalId,
        refresh_token: &str,
    ) -> Result<(), RepositoryError>;
}

/// Out-of-band delivery of verification codes.
#[async_trait]
pub trait CodeNotifier: Send + Sync + 'static {
    /// Deliver a code to an email address.
    ///
    /// # Errors
    /// * `SendFailed` - Outbound delivery failed
    async fn send_code(&self, code: &str, email: &EmailAddress) -> Result<(), NotifierError>;
}
