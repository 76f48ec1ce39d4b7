use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for PrincipalId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrincipalIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Failures surfaced by the repository collaborator.
///
/// Uniqueness, code expiry, and atomic single-use enforcement live behind
/// the repository; this core only interprets the outcome.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("No account for email")]
    AccountNotFound,

    #[error("Verification code not found")]
    CodeNotFound,

    #[error("Verification code expired")]
    CodeExpired,

    #[error("Verification code already used")]
    CodeConsumed,

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Failures surfaced by the notifier collaborator.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Failed to send code: {0}")]
    SendFailed(String),
}

/// Failures of verification code record/redeem operations.
///
/// The redemption variants are not distinguished to end callers (see
/// `AuthError::CodeRedemptionFailed`); they exist so the orchestrator can
/// separate redemption outcomes from infrastructure failures.
#[derive(Debug, Clone, Error)]
pub enum CodeError {
    #[error("Code is invalid")]
    Invalid,

    #[error("Code is expired")]
    Expired,

    #[error("Code was already used")]
    Consumed,

    #[error("Repository error: {0}")]
    Repository(String),
}

/// Top-level error for all authentication operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Deliberately conflates unknown-email and wrong-password failures
    // so callers cannot enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid principal ID: {0}")]
    InvalidPrincipalId(#[from] PrincipalIdError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    // Domain-level errors
    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    // Conflates invalid, expired, and already-used codes so callers cannot
    // tell which check rejected them.
    #[error("Code redemption failed")]
    CodeRedemptionFailed,

    // Infrastructure errors
    #[error("Notification error: {0}")]
    Notification(#[from] NotifierError),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Repository(err.to_string())
    }
}
