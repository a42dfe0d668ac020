use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Token kind, carried on the wire as the `aud` claim.
///
/// A token of one kind is never accepted where the other is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Admin,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Admin => "admin",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire representation of a token payload (RFC 7519 field names).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the login of the authenticated user
    pub sub: String,

    /// Audience: "access" or "admin", discriminates the token kind
    pub aud: String,

    /// Issuer: fixed string identifying this system
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Unique token id; can be used to implement revocation through
    /// blacklisting
    pub jti: String,

    /// Only present on access tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Only present on access tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_claims_omit_email_and_role() {
        let claims = Claims {
            sub: "bob".to_string(),
            aud: TokenKind::Admin.as_str().to_string(),
            iss: "directory-service".to_string(),
            iat: 1_000,
            exp: 1_300,
            jti: "id".to_string(),
            email: None,
            role: None,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("email"));
        assert!(!json.contains("role"));
    }

    #[test]
    fn test_claims_round_trip_with_missing_optional_fields() {
        let json = r#"{"sub":"bob","aud":"admin","iss":"x","iat":1,"exp":2,"jti":"j"}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "bob");
        assert_eq!(claims.email, None);
        assert_eq!(claims.role, None);
    }
}
