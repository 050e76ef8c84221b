//! JWT authentication.
//!
//! Tokens are issued by the identity provider (or the `token` dev command)
//! and verified statelessly on each request.
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, optional_jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let routes = Router::new()
//!     .route("/api/events", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, optional_jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, JwtError, TokenSubject};
pub use middleware::{MaybeClaims, optional_jwt_auth_middleware};
