//! Identity seam for the registration flow

use crate::error::{EventError, Result};
use crate::models::User;
use async_trait::async_trait;
use axum_helpers::JwtClaims;

/// Source of the current user.
///
/// `current_user` being `None` is the normal anonymous case. `sign_in` is
/// interactive and only invoked by the caller, never by the registration
/// workflow on its own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGate: Send + Sync {
    fn current_user(&self) -> Option<User>;

    async fn sign_in(&self) -> Result<User>;
}

impl From<&JwtClaims> for User {
    fn from(claims: &JwtClaims) -> Self {
        Self {
            id: claims.sub.clone(),
            display_name: claims.name.clone(),
            email: claims.email.clone(),
            avatar: claims.picture.clone(),
        }
    }
}

/// Request-scoped gate backed by the verified access token, if any.
///
/// Interactive sign-in belongs to the identity provider, so `sign_in` only
/// succeeds when the request already carries a valid token.
#[derive(Debug, Clone, Default)]
pub struct RequestAuth {
    user: Option<User>,
}

impl RequestAuth {
    pub fn new(claims: Option<&JwtClaims>) -> Self {
        Self {
            user: claims.map(User::from),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthGate for RequestAuth {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }

    async fn sign_in(&self) -> Result<User> {
        self.user
            .clone()
            .ok_or_else(|| EventError::Unauthenticated("missing or invalid access token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> JwtClaims {
        JwtClaims {
            sub: "user-42".into(),
            email: "ada@example.com".into(),
            name: "Ada Lovelace".into(),
            picture: Some("https://example.com/ada.png".into()),
            roles: vec![],
            exp: 0,
            iat: 0,
            jti: "jti-1".into(),
        }
    }

    #[test]
    fn test_user_from_claims() {
        let user = User::from(&claims());
        assert_eq!(user.id, "user-42");
        assert_eq!(user.display_name, "Ada Lovelace");
        assert_eq!(user.avatar.as_deref(), Some("https://example.com/ada.png"));
    }

    #[tokio::test]
    async fn test_request_auth_with_token() {
        let claims = claims();
        let auth = RequestAuth::new(Some(&claims));

        assert_eq!(auth.current_user().map(|u| u.id), Some("user-42".into()));
        assert_eq!(auth.sign_in().await.unwrap().email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_anonymous_sign_in_fails() {
        let auth = RequestAuth::anonymous();

        assert!(auth.current_user().is_none());
        assert!(matches!(
            auth.sign_in().await,
            Err(EventError::Unauthenticated(_))
        ));
    }
}
