use core_config::{ConfigError, FromEnv, env_parse_or, env_required};

use super::jwt::ACCESS_TOKEN_TTL;

const MIN_SECRET_LEN: usize = 32;

/// JWT signing configuration.
///
/// Environment variables:
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_ACCESS_TOKEN_TTL_SECS` (default: 900)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl_secs: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        validate_secret(&secret)?;
        Ok(Self {
            secret,
            access_token_ttl_secs: ACCESS_TOKEN_TTL,
        })
    }
}

fn validate_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::Invalid {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {MIN_SECRET_LEN} characters (got {}). Generate one with: openssl rand -base64 32",
                secret.len()
            ),
        });
    }
    Ok(())
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        validate_secret(&secret)?;

        Ok(Self {
            secret,
            access_token_ttl_secs: env_parse_or("JWT_ACCESS_TOKEN_TTL_SECS", ACCESS_TOKEN_TTL)?,
        })
    }
}
