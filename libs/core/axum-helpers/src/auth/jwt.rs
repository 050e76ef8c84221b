use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Access token lifetime in seconds (15 minutes)
pub const ACCESS_TOKEN_TTL: i64 = 900;

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by access tokens issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // User ID
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Identity of the token holder, used when minting a token.
#[derive(Debug, Clone, Default)]
pub struct TokenSubject<'a> {
    pub user_id: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub picture: Option<&'a str>,
}

/// Stateless HS256 token issue and verification
#[derive(Clone)]
pub struct JwtAuth {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    access_token_ttl: i64,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!("JWT auth initialized");
        Self {
            encoding: Arc::new(EncodingKey::from_secret(config.secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(config.secret.as_bytes())),
            access_token_ttl: config.access_token_ttl_secs,
        }
    }

    pub fn create_access_token(&self, subject: &TokenSubject<'_>) -> Result<String, JwtError> {
        self.create_token(subject, self.access_token_ttl)
    }

    fn create_token(&self, subject: &TokenSubject<'_>, ttl_seconds: i64) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject.user_id.to_string(),
            email: subject.email.to_string(),
            name: subject.name.to_string(),
            picture: subject.picture.map(str::to_string),
            roles: Vec::new(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Checks the signature and expiry and returns the claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, JwtError> {
        let token_data = decode::<JwtClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(secret: &str) -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(secret).unwrap())
    }

    fn subject() -> TokenSubject<'static> {
        TokenSubject {
            user_id: "user-1",
            email: "ada@example.com",
            name: "Ada",
            picture: Some("https://example.com/ada.png"),
        }
    }

    #[test]
    fn test_issued_token_verifies() {
        let auth = auth("this-is-a-valid-secret-with-32-chars!");
        let token = auth.create_access_token(&subject()).unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.picture.as_deref(), Some("https://example.com/ada.png"));
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_TTL);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let issuer = auth("this-is-a-valid-secret-with-32-chars!");
        let verifier = auth("another-valid-secret-with-32-characters");
        let token = issuer.create_access_token(&subject()).unwrap();

        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = auth("this-is-a-valid-secret-with-32-chars!");
        let token = auth.create_token(&subject(), -3600).unwrap();

        assert!(auth.verify_token(&token).is_err());
    }
}
