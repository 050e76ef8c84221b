use super::jwt::{JwtAuth, JwtClaims};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Bearer token from `Authorization`, falling back to the `access_token` cookie.
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .or_else(|| {
            headers
                .get_all(header::COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|cookies| cookies.split(';'))
                .find_map(|cookie| {
                    let (name, value) = cookie.trim().split_once('=')?;
                    (name == ACCESS_TOKEN_COOKIE).then(|| value.to_string())
                })
        })
        .filter(|token| !token.is_empty())
}

/// Attaches [`JwtClaims`] to the request when a valid token is present.
///
/// Anonymous requests and invalid tokens pass through without claims so
/// handlers can decide how to treat unauthenticated callers.
pub async fn optional_jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token_from_request(request.headers()) {
        match auth.verify_token(&token) {
            Ok(claims) => {
                tracing::debug!(user_id = %claims.sub, "Authenticated request");
                request.extensions_mut().insert(claims);
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring invalid JWT"),
        }
    }

    next.run(request).await
}

/// Extractor for the claims attached by [`optional_jwt_auth_middleware`].
///
/// Never rejects; holds `None` for anonymous callers.
#[derive(Debug, Clone)]
pub struct MaybeClaims(pub Option<JwtClaims>);

impl<S> FromRequestParts<S> for MaybeClaims
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<JwtClaims>().cloned()))
    }
}
