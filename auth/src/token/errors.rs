use thiserror::Error;

/// Error type for token operations.
///
/// The validation variants are distinguishable for logging and tests; at the
/// HTTP boundary they are all reported as a single generic failure so
/// responses don't reveal why a token was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("secret key is empty")]
    EmptySecret,

    #[error("failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature mismatch")]
    InvalidSignature,

    #[error("token is expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("wrong token audience: expected '{expected}', got '{actual}'")]
    WrongAudience { expected: String, actual: String },

    #[error("wrong token issuer: '{0}'")]
    WrongIssuer(String),
}
