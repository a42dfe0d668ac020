//! Authentication library
//!
//! Provides the authentication core for the directory service:
//! - Password hashing (Argon2id), with an equal-cost dummy comparison for
//!   unknown logins
//! - Signed tokens of two kinds: ordinary "access" tokens and elevated
//!   "admin" tokens, discriminated by the `aud` claim
//! - The identities reconstructed from verified tokens
//!
//! The HTTP layer and the user store live in the service crate; this crate is
//! stateless beyond the immutable signing key.
//!
//! # Examples
//!
//! ## Tokens
//! ```
//! use auth::TokenManager;
//! use auth::TokenManagerConfig;
//!
//! let manager = TokenManager::new("s3cret", TokenManagerConfig::default()).unwrap();
//! let token = manager.generate_access_token("alice", "a@x.com", "user").unwrap();
//! let identity = manager.parse_access_token(&token).unwrap();
//! assert_eq!(identity.login, "alice");
//! assert_eq!(identity.email, "a@x.com");
//! ```
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//!
//! // Unknown login: same cost as a real comparison, always false.
//! assert!(!hasher.verify_or_dummy("my_password", None).unwrap());
//! ```

pub mod identity;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use identity::AccessIdentity;
pub use identity::AdminIdentity;
pub use identity::Identity;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenKind;
pub use token::TokenManager;
pub use token::TokenManagerConfig;
