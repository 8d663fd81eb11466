//! Gas comparison endpoint.

use super::contracts::json_body;
use super::AppState;
use crate::domain::dto::CompareRequest;
use crate::domain::error::ApiError;
use ac_05_gas_audit::GasComparison;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

/// `POST /compare-gas-and-storage`
///
/// Archives every listed contract. Slow and not transactional; see
/// `GasAudit::compare_usage`.
pub async fn compare(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<GasComparison>, ApiError> {
    let request = json_body(payload)?;
    Ok(Json(
        state
            .gas_audit
            .compare_usage(&request.contract_addresses)
            .await?,
    ))
}
