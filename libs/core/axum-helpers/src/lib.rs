//! # Axum Helpers
//!
//! Shared HTTP plumbing for the items service.
//!
//! - **[`errors`]**: `AppError` and the JSON bodies it renders
//! - **[`extractors`]**: `IdPath` and `JsonBody`
//! - **[`http`]**: CORS and security header middleware
//! - **[`server`]**: router assembly, health/readiness, graceful shutdown
//! - **[`audit`]**: structured audit events for data changes

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse, ValidationErrorResponse};

pub use extractors::{IdPath, JsonBody};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
