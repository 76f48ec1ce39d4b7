use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Once;

use async_trait::async_trait;
use auth::TokenIssuer;
use chrono::Duration;
use identity_service::domain::auth::errors::NotifierError;
use identity_service::domain::auth::errors::RepositoryError;
use identity_service::domain::auth::models::CodePurpose;
use identity_service::domain::auth::models::EmailAddress;
use identity_service::domain::auth::models::Principal;
use identity_service::domain::auth::models::PrincipalId;
use identity_service::domain::auth::models::StoredCredentials;
use identity_service::domain::auth::ports::AuthRepository;
use identity_service::domain::auth::ports::CodeNotifier;
use identity_service::domain::auth::service::AuthService;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "identity_service=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Test harness wiring the service to in-memory collaborators
pub struct TestIdentity {
    pub service: AuthService<InMemoryAuthRepository, RecordingNotifier>,
    pub repository: Arc<InMemoryAuthRepository>,
    pub notifier: Arc<RecordingNotifier>,
    pub token_issuer: Arc<TokenIssuer>,
}

impl TestIdentity {
    pub fn new() -> Self {
        init_tracing();

        let repository = Arc::new(InMemoryAuthRepository::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let token_issuer = Arc::new(TokenIssuer::new(
            b"test_secret_key_at_least_32_bytes!",
            Duration::minutes(15),
            Duration::days(30),
        ));

        let service = AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&notifier),
            Arc::clone(&token_issuer),
        );

        Self {
            service,
            repository,
            notifier,
            token_issuer,
        }
    }

    pub fn email(s: &str) -> EmailAddress {
        EmailAddress::new(s.to_string()).expect("Failed to parse test email")
    }
}

struct StoredCode {
    code: String,
    email: String,
    purpose: CodePurpose,
    consumed: bool,
}

/// In-memory repository enforcing the collaborator contracts the core
/// relies on: email uniqueness, one authoritative code per (email, purpose),
/// and atomic single-use redemption.
pub struct InMemoryAuthRepository {
    accounts: Mutex<HashMap<String, Principal>>,
    codes: Mutex<Vec<StoredCode>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            codes: Mutex::new(Vec::new()),
        }
    }

    /// Peek the authoritative (unconsumed) code for an email and purpose.
    pub fn current_code(&self, email: &str, purpose: CodePurpose) -> Option<String> {
        self.codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.email == email && c.purpose == purpose && !c.consumed)
            .map(|c| c.code.clone())
    }

    pub fn stored_refresh_token(&self, email: &str) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .and_then(|p| p.refresh_token.clone())
    }

    pub fn stored_password_hash(&self, email: &str) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .map(|p| p.password_hash.clone())
    }
}

#[async_trait]
impl AuthRepository for InMemoryAuthRepository {
    async fn register(&self, principal: Principal) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        let key = principal.email.as_str().to_string();
        if accounts.contains_key(&key) {
            return Err(RepositoryError::DuplicateEmail(key));
        }
        accounts.insert(key, principal);
        Ok(())
    }

    async fn get_hash_and_id(
        &self,
        email: &EmailAddress,
    ) -> Result<StoredCredentials, RepositoryError> {
        self.accounts
            .lock()
            .unwrap()
            .get(email.as_str())
            .map(|p| StoredCredentials {
                principal_id: p.id,
                password_hash: p.password_hash.clone(),
            })
            .ok_or(RepositoryError::AccountNotFound)
    }

    async fn login(
        &self,
        email: &EmailAddress,
        refresh_token: &str,
    ) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        let principal = accounts
            .get_mut(email.as_str())
            .ok_or(RepositoryError::AccountNotFound)?;
        principal.refresh_token = Some(refresh_token.to_string());
        Ok(())
    }

    async fn password_recovery(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        let principal = accounts
            .get_mut(email.as_str())
            .ok_or(RepositoryError::AccountNotFound)?;
        principal.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn email_add_code(
        &self,
        code: &str,
        email: &EmailAddress,
        purpose: CodePurpose,
    ) -> Result<(), RepositoryError> {
        let mut codes = self.codes.lock().unwrap();
        // The newest code for a pair supersedes any earlier one
        codes.retain(|c| !(c.email == email.as_str() && c.purpose == purpose && !c.consumed));
        codes.push(StoredCode {
            code: code.to_string(),
            email: email.as_str().to_string(),
            purpose,
            consumed: false,
        });
        Ok(())
    }

    async fn email_verify_code(
        &self,
        code: &str,
        email: &EmailAddress,
        purpose: CodePurpose,
    ) -> Result<PrincipalId, RepositoryError> {
        let mut codes = self.codes.lock().unwrap();
        let entry = codes
            .iter_mut()
            .find(|c| c.code == code && c.email == email.as_str() && c.purpose == purpose)
            .ok_or(RepositoryError::CodeNotFound)?;
        if entry.consumed {
            return Err(RepositoryError::CodeConsumed);
        }
        entry.consumed = true;
        drop(codes);

        self.accounts
            .lock()
            .unwrap()
            .get(email.as_str())
            .map(|p| p.id)
            .ok_or_else(|| RepositoryError::Storage("no principal for code".to_string()))
    }

    async fn update_refresh_token(
        &self,
        id: &PrincipalId,
        refresh_token: &str,
    ) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        let principal = accounts
            .values_mut()
            .find(|p| p.id == *id)
            .ok_or(RepositoryError::AccountNotFound)?;
        principal.refresh_token = Some(refresh_token.to_string());
        Ok(())
    }
}

/// Notifier that records every delivery instead of sending mail.
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeNotifier for RecordingNotifier {
    async fn send_code(&self, code: &str, email: &EmailAddress) -> Result<(), NotifierError> {
        self.sent
            .lock()
            .unwrap()
            .push((code.to_string(), email.as_str().to_string()));
        Ok(())
    }
}
