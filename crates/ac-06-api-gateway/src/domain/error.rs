//! HTTP error mapping.
//!
//! Every failure leaves the gateway as `{"error": <kind>, "detail": <text>}`
//! where `kind` is the stable `kind()` string of the originating error.

use ac_04_lifecycle::errors::LifecycleError;
use ac_05_gas_audit::AuditError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Status code for an error kind.
#[must_use]
pub fn status_for_kind(kind: &str) -> StatusCode {
    match kind {
        "InvalidSource" | "InvalidRequest" | "AbiError" | "EmptyBatch" | "BatchTooLarge" => {
            StatusCode::BAD_REQUEST
        }
        "ContentNotFound" | "SourceNotFound" | "NotRegistered" => StatusCode::NOT_FOUND,
        "InvalidTransition" | "AlreadyRegistered" => StatusCode::CONFLICT,
        "CompilationFailed" | "TransactionReverted" | "EmptyDeployment" => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        "ChainUnavailable" | "StoreUnavailable" | "ExplorerUnavailable"
        | "ToolchainUnavailable" | "HistoryUnavailable" => StatusCode::SERVICE_UNAVAILABLE,
        "ChainRpcError" | "ChainInvalidResponse" | "UnknownContractState" | "StoreRejected"
        | "StoreInvalidResponse" | "ExplorerInvalidResponse" => StatusCode::BAD_GATEWAY,
        "CompilationTimeout" => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: String,
    pub detail: String,
}

impl ApiError {
    pub fn new(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            status: status_for_kind(&kind),
            kind,
            detail: detail.into(),
        }
    }

    /// Malformed or missing request input.
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::new("InvalidRequest", detail)
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<AuditError> for ApiError {
    fn from(err: AuditError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, kind = %self.kind, detail = %self.detail, "Request failed");
        } else {
            warn!(status = %self.status, kind = %self.kind, detail = %self.detail, "Request rejected");
        }
        let body = ErrorBody {
            error: self.kind,
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Gateway service errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server bind error: {0}")]
    Bind(String),

    #[error("server error: {0}")]
    Serve(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Address;

    #[test]
    fn test_kind_to_status_mapping() {
        let cases = [
            ("InvalidSource", 400),
            ("ContentNotFound", 404),
            ("NotRegistered", 404),
            ("InvalidTransition", 409),
            ("AlreadyRegistered", 409),
            ("CompilationFailed", 422),
            ("TransactionReverted", 422),
            ("ArtifactMissing", 500),
            ("ChainUnavailable", 503),
            ("StoreUnavailable", 503),
            ("ChainRpcError", 502),
            ("PersistenceError", 500),
        ];
        for (kind, status) in cases {
            assert_eq!(status_for_kind(kind).as_u16(), status, "{kind}");
        }
    }

    #[test]
    fn test_lifecycle_error_keeps_kind() {
        let err: ApiError = LifecycleError::AlreadyRegistered(Address::ZERO).into();
        assert_eq!(err.kind, "AlreadyRegistered");
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(err.detail.contains("0x0000"));
    }
}
