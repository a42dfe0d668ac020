use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Key id put into every token header. A single static secret for now;
/// rotation would read `kid` back out of the header and fetch the matching
/// secret before verifying.
const KEY_ID: &str = "kid";

/// Stateless signer/verifier for compact token strings.
///
/// Signs `header.payload` with HMAC-SHA256 using a symmetric secret. The
/// signature comparison during verification is constant-time (done inside
/// `jsonwebtoken`), so a forged signature can't be searched byte by byte.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec from a symmetric secret.
    ///
    /// # Errors
    /// * `EmptySecret` - The secret is empty. Checked once here, never per
    ///   call.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
        })
    }

    /// Serialize and sign a claim set into a compact token string.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let mut header = Header::new(self.algorithm);
        header.kid = Some(KEY_ID.to_string());

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify the signature and decode the payload into a claim set.
    ///
    /// Only the signature is checked here. Temporal, audience and issuer
    /// rules belong to the manager so that claim-validation failures come
    /// back in a deterministic order.
    ///
    /// # Errors
    /// * `Malformed` - The token cannot be split or decoded
    /// * `InvalidSignature` - The MAC check failed
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::super::claims::TokenKind;
    use super::*;

    fn claims() -> Claims {
        Claims {
            sub: "alice".to_string(),
            aud: TokenKind::Access.as_str().to_string(),
            iss: "directory-service".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_000_300,
            jti: "7e0b1c3e-0000-0000-0000-000000000000".to_string(),
            email: Some("a@x.com".to_string()),
            role: Some("user".to_string()),
        }
    }

    // Replace one character of a base64url segment with a different valid
    // base64url character.
    fn flip_char(segment: &str, at: usize) -> String {
        let mut chars: Vec<char> = segment.chars().collect();
        chars[at] = if chars[at] == 'A' { 'B' } else { 'A' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_encode_and_decode_round_trip() {
        let codec = TokenCodec::new("s3cret").unwrap();

        let token = codec.encode(&claims()).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded, claims());
    }

    #[test]
    fn test_empty_secret_rejected_at_construction() {
        assert_eq!(TokenCodec::new("").unwrap_err(), TokenError::EmptySecret);
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let codec = TokenCodec::new("s3cret").unwrap();
        let other = TokenCodec::new("another-secret").unwrap();

        let token = codec.encode(&claims()).unwrap();
        assert_eq!(
            other.decode(&token).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_tampered_payload_fails_verification() {
        let codec = TokenCodec::new("s3cret").unwrap();
        let token = codec.encode(&claims()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], flip_char(parts[1], 8), parts[2]);

        assert_eq!(
            codec.decode(&tampered).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_tampered_signature_fails_verification() {
        let codec = TokenCodec::new("s3cret").unwrap();
        let token = codec.encode(&claims()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], parts[1], flip_char(parts[2], 8));

        assert_eq!(
            codec.decode(&tampered).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let codec = TokenCodec::new("s3cret").unwrap();
        assert!(matches!(
            codec.decode("not-a-token").unwrap_err(),
            TokenError::Malformed(_)
        ));
        assert!(matches!(
            codec.decode("a.b").unwrap_err(),
            TokenError::Malformed(_)
        ));
    }
}
