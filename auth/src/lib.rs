//! Credential primitives library
//!
//! Provides the cryptographic building blocks for the identity service:
//! - Password hashing (Argon2id)
//! - Signed, time-bounded token issuance and verification (JWT)
//!
//! The orchestration layer owns sequencing and persistence; this crate only
//! transforms and checks secrets. Both primitives are pure over their inputs
//! and safe to share across request contexts.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! assert!(hasher.verify("not_my_password", &hash).is_err());
//! ```
//!
//! ## Token Issuance
//! ```
//! use auth::{TokenIssuer, TokenKind};
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::minutes(15),
//!     Duration::days(30),
//! );
//!
//! let token = issuer.issue("principal-123", TokenKind::Access).unwrap();
//! let claims = issuer.verify(&token).unwrap();
//! assert_eq!(claims.sub, "principal-123");
//! assert_eq!(claims.kind, TokenKind::Access);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenIssuer;
pub use token::TokenKind;
