//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`auth`]**: stateless JWT verification and the optional-auth middleware
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS and security-header middleware
//! - **[`errors`]**: structured error responses with error codes

pub mod auth;
pub mod errors;
pub mod http;
pub mod server;

pub use auth::{
    ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, JwtConfig, JwtError, MaybeClaims, TokenSubject,
    optional_jwt_auth_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};
