use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use super::claims::Claims;
use super::claims::TokenKind;
use super::codec::TokenCodec;
use super::errors::TokenError;
use crate::identity::AccessIdentity;
use crate::identity::AdminIdentity;

/// Token manager configuration, supplied once at construction and never
/// reloaded.
#[derive(Debug, Clone)]
pub struct TokenManagerConfig {
    /// Value of the `iss` claim; parsing rejects tokens minted by anyone
    /// else. Could be used later to restrict validity to a sub-organization.
    pub issuer: String,
    pub access_token_ttl: Duration,
    pub admin_token_ttl: Duration,
}

impl Default for TokenManagerConfig {
    fn default() -> Self {
        Self {
            issuer: "directory-service".to_string(),
            access_token_ttl: Duration::minutes(5),
            admin_token_ttl: Duration::minutes(5),
        }
    }
}

/// Domain-level token lifecycle on top of the codec.
///
/// Builds the claim sets for the two token kinds and enforces the semantic
/// claim rules (timing, audience, issuer) beyond signature correctness.
pub struct TokenManager {
    codec: TokenCodec,
    issuer: String,
    access_token_ttl: Duration,
    admin_token_ttl: Duration,
}

impl TokenManager {
    /// Create a token manager.
    ///
    /// # Errors
    /// * `EmptySecret` - The secret key is empty
    pub fn new(secret: &str, config: TokenManagerConfig) -> Result<Self, TokenError> {
        Ok(Self {
            codec: TokenCodec::new(secret)?,
            issuer: config.issuer,
            access_token_ttl: config.access_token_ttl,
            admin_token_ttl: config.admin_token_ttl,
        })
    }

    /// Mint an access token for an authenticated user.
    pub fn generate_access_token(
        &self,
        login: &str,
        email: &str,
        role: &str,
    ) -> Result<String, TokenError> {
        self.generate_access_token_at(login, email, role, Utc::now())
    }

    /// Mint an admin token. The caller is responsible for checking the admin
    /// role before asking for one.
    pub fn generate_admin_token(&self, login: &str) -> Result<String, TokenError> {
        self.generate_admin_token_at(login, Utc::now())
    }

    /// Verify and validate an access token, reconstructing the caller's
    /// identity.
    pub fn parse_access_token(&self, token: &str) -> Result<AccessIdentity, TokenError> {
        self.parse_access_token_at(token, Utc::now())
    }

    /// Verify and validate an admin token.
    pub fn parse_admin_token(&self, token: &str) -> Result<AdminIdentity, TokenError> {
        self.parse_admin_token_at(token, Utc::now())
    }

    fn generate_access_token_at(
        &self,
        login: &str,
        email: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let mut claims = self.new_claims(login, TokenKind::Access, self.access_token_ttl, now);
        claims.email = Some(email.to_string());
        claims.role = Some(role.to_string());
        self.codec.encode(&claims)
    }

    fn generate_admin_token_at(&self, login: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = self.new_claims(login, TokenKind::Admin, self.admin_token_ttl, now);
        self.codec.encode(&claims)
    }

    fn parse_access_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessIdentity, TokenError> {
        let claims = self.codec.decode(token)?;
        self.validate(&claims, TokenKind::Access, now)?;

        Ok(AccessIdentity {
            login: claims.sub,
            email: claims.email.unwrap_or_default(),
            role: claims.role.unwrap_or_default(),
        })
    }

    fn parse_admin_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AdminIdentity, TokenError> {
        let claims = self.codec.decode(token)?;
        self.validate(&claims, TokenKind::Admin, now)?;

        Ok(AdminIdentity { login: claims.sub })
    }

    fn new_claims(
        &self,
        login: &str,
        kind: TokenKind,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Claims {
        Claims {
            sub: login.to_string(),
            aud: kind.as_str().to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
            email: None,
            role: None,
        }
    }

    // Validation order is fixed (issued-at, expiry, audience, issuer) so a
    // crafted bad token fails with a predictable kind.
    fn validate(&self, claims: &Claims, kind: TokenKind, now: DateTime<Utc>) -> Result<(), TokenError> {
        let now = now.timestamp();
        if claims.iat > now {
            return Err(TokenError::NotYetValid);
        }
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        if claims.aud != kind.as_str() {
            return Err(TokenError::WrongAudience {
                expected: kind.as_str().to_string(),
                actual: claims.aud.clone(),
            });
        }
        if claims.iss != self.issuer {
            return Err(TokenError::WrongIssuer(claims.iss.clone()));
        }
        Ok(())
    }
}
