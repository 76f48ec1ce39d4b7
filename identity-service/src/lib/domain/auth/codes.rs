use std::sync::Arc;

use rand::Rng;

use crate::domain::auth::errors::CodeError;
use crate::domain::auth::errors::RepositoryError;
use crate::domain::auth::models::CodePurpose;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::PrincipalId;
use crate::domain::auth::ports::AuthRepository;

/// Verification code service.
///
/// Generates numeric one-time codes and delegates durable storage, expiry,
/// and single-use enforcement to the repository collaborator.
pub struct VerificationCodes<R> {
    repository: Arc<R>,
}

impl<R> VerificationCodes<R>
where
    R: AuthRepository,
{
    /// Create a new verification code service.
    ///
    /// # Arguments
    /// * `repository` - Persistence implementation for codes
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Generate a uniformly random 4-digit code.
    ///
    /// The space is 1000..10000 (9000 values). This is deliberately small
    /// and only safe when paired with attempt limiting upstream; rate
    /// limiting is an edge-layer concern.
    pub fn generate(&self) -> String {
        random_code()
    }

    /// Durably record a code for an email and purpose.
    ///
    /// # Errors
    /// * `Repository` - Persistence failed
    pub async fn record(
        &self,
        code: &str,
        email: &EmailAddress,
        purpose: CodePurpose,
    ) -> Result<(), CodeError> {
        self.repository
            .email_add_code(code, email, purpose)
            .await
            .map_err(|e| CodeError::Repository(e.to_string()))
    }

    /// Redeem a code, consuming it permanently.
    ///
    /// The repository performs the validate-and-consume atomically; a
    /// successful return is proof of single consumption and must never be
    /// replayed.
    ///
    /// # Returns
    /// Identifier of the principal the code belongs to
    ///
    /// # Errors
    /// * `Invalid` - No such code for this email and purpose
    /// * `Expired` - Code validity window has passed
    /// * `Consumed` - Code was already redeemed
    /// * `Repository` - Persistence failed
    pub async fn redeem(
        &self,
        code: &str,
        email: &EmailAddress,
        purpose: CodePurpose,
    ) -> Result<PrincipalId, CodeError> {
        self.repository
            .email_verify_code(code, email, purpose)
            .await
            .map_err(|e| match e {
                RepositoryError::CodeNotFound => CodeError::Invalid,
                RepositoryError::CodeExpired => CodeError::Expired,
                RepositoryError::CodeConsumed => CodeError::Consumed,
                e => CodeError::Repository(e.to_string()),
            })
    }
}

fn random_code() -> String {
    rand::thread_rng().gen_range(1000..10000).to_string()
}
