//! # HTTP Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | `/compile-contract` | `contracts::compile` |
//! | POST | `/deploy-contract` | `contracts::deploy` |
//! | POST | `/archive-contract` | `contracts::archive` |
//! | POST | `/update-contract-state` | `contracts::update_state` |
//! | GET | `/contract-state/:address` | `contracts::get_state` |
//! | GET | `/archived-contracts` | `contracts::list_archived` |
//! | POST | `/compare-gas-and-storage` | `audit::compare` |
//! | GET | `/health` | `health::health` |

pub mod audit;
pub mod contracts;
pub mod health;

use crate::domain::config::GatewayConfig;
use crate::middleware::create_cors_layer;
use ac_04_lifecycle::ports::inbound::LifecycleApi;
use ac_05_gas_audit::GasAudit;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::map_response_body::MapResponseBodyLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<dyn LifecycleApi>,
    pub gas_audit: Arc<GasAudit>,
}

/// Build the HTTP router with its middleware stack.
pub fn router(state: AppState, config: &GatewayConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(&config.cors))
        .layer(MapResponseBodyLayer::new(axum::body::Body::new))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes));

    Router::new()
        .route("/compile-contract", post(contracts::compile))
        .route("/deploy-contract", post(contracts::deploy))
        .route("/archive-contract", post(contracts::archive))
        .route("/update-contract-state", post(contracts::update_state))
        .route("/contract-state/:address", get(contracts::get_state))
        .route("/archived-contracts", get(contracts::list_archived))
        .route("/compare-gas-and-storage", post(audit::compare))
        .route("/health", get(health::health))
        // Multipart reads enforce their own limit.
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(middleware)
        .with_state(state)
}
