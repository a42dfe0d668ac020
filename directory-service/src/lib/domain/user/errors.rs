use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Login validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("missing or empty 'login'")]
    Empty,

    #[error("login too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("login contains invalid characters (only alphanumeric, underscore, and hyphen allowed)")]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Role validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("missing or empty 'role'")]
    Empty,
}

/// Error returned by user store implementations.
///
/// `Unavailable` carries the underlying failure detail for logs; it is never
/// echoed to HTTP callers. The caller may retry; the store never retries
/// internally.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(String),

    #[error("user {0} already exists")]
    AlreadyExists(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for credential checks and token issuance.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("you don't have the admin role")]
    InsufficientRole,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("internal error: {0}")]
    Internal(String),
}
