//! # AC-06 API Gateway - HTTP Surface
//!
//! **Component ID:** 6
//!
//! ## Purpose
//!
//! Exposes the lifecycle orchestrator and the gas audit over HTTP/JSON for
//! the dashboard and the browser extension.
//!
//! ## Error Contract
//!
//! Every error body is `{"error": <kind>, "detail": <text>}`:
//!
//! | Status | Kinds |
//! |--------|-------|
//! | 400 | `InvalidSource`, `InvalidRequest`, `AbiError`, batch validation |
//! | 404 | `ContentNotFound`, `SourceNotFound`, `NotRegistered` |
//! | 409 | `InvalidTransition`, `AlreadyRegistered` |
//! | 422 | `CompilationFailed`, `TransactionReverted`, `EmptyDeployment` |
//! | 500 | `ArtifactMissing` and internal failures |
//! | 502 | malformed upstream responses |
//! | 503 | `ChainUnavailable`, `StoreUnavailable`, explorer and toolchain outages |
//!
//! ## Middleware
//!
//! `TraceLayer` (request spans), CORS, request body limit.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod domain;
pub mod middleware;
pub mod routes;
pub mod service;

pub use domain::config::{ConfigError, CorsConfig, GatewayConfig};
pub use domain::error::{status_for_kind, ApiError, ErrorBody, GatewayError};
pub use routes::{router, AppState};
pub use service::ApiGatewayService;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component ID.
pub const COMPONENT_ID: u8 = 6;
